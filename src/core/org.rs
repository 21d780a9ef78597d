//! Users, departments and projects.

use crate::core::calculator::progress::{project_progress, project_total_hours, remaining_hours};
use crate::db::log::audit;
use crate::db::queries::{org, projects};
use crate::errors::{AppError, AppResult};
use crate::models::department::{Department, User};
use crate::models::project::{Project, ProjectStatus};
use crate::models::stats::ProjectReport;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

pub const DEFAULT_COLOR: &str = "#4A5568";

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[A-Fa-f0-9]{6}$").unwrap_or_else(|e| panic!("invalid color pattern: {e}"))
});

pub fn is_valid_color(s: &str) -> bool {
    COLOR_RE.is_match(s)
}

pub struct OrgLogic;

impl OrgLogic {
    pub fn create_user(conn: &Connection, name: &str, department_id: Option<i64>) -> AppResult<User> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("user name cannot be empty".into()));
        }
        if let Some(did) = department_id
            && org::load_department(conn, did)?.is_none()
        {
            return Err(AppError::not_found("department", did));
        }

        let tx = conn.unchecked_transaction()?;
        let id = org::insert_user(&tx, name, department_id)?;
        audit(&tx, "user_add", &format!("user {}", id), name)?;
        tx.commit()?;
        Ok(User {
            id,
            name: name.to_string(),
            department_id,
        })
    }

    pub fn create_department(conn: &Connection, name: &str, color: Option<&str>) -> AppResult<Department> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("department name cannot be empty".into()));
        }
        let color = color.unwrap_or(DEFAULT_COLOR);
        if !is_valid_color(color) {
            return Err(AppError::InvalidInput(format!(
                "color must look like #RRGGBB, got '{}'",
                color
            )));
        }

        let tx = conn.unchecked_transaction()?;
        let id = org::insert_department(&tx, name, color)?;
        audit(&tx, "dept_add", &format!("department {}", id), name)?;
        tx.commit()?;
        Ok(Department {
            id,
            name: name.to_string(),
            color: color.to_string(),
        })
    }

    /// Refused while users or projects still belong to the department.
    pub fn delete_department(conn: &Connection, id: i64) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        if org::load_department(&tx, id)?.is_none() {
            return Err(AppError::not_found("department", id));
        }
        if !org::users_in_department(&tx, id)?.is_empty() {
            return Err(AppError::InvalidInput(
                "Cannot delete department with assigned users.".into(),
            ));
        }
        if !projects::projects_for_department(&tx, id)?.is_empty() {
            return Err(AppError::InvalidInput(
                "Cannot delete department with assigned projects.".into(),
            ));
        }

        org::delete_department(&tx, id)?;
        audit(&tx, "dept_del", &format!("department {}", id), "deleted")?;
        tx.commit()?;
        Ok(())
    }

    pub fn create_project(
        conn: &Connection,
        name: &str,
        department_id: i64,
        estimated_hours: Option<f64>,
        status: ProjectStatus,
    ) -> AppResult<Project> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("project name cannot be empty".into()));
        }
        if let Some(est) = estimated_hours
            && (!est.is_finite() || est < 0.0)
        {
            return Err(AppError::InvalidInput(format!(
                "estimate must be a non-negative number, got {}",
                est
            )));
        }
        if org::load_department(conn, department_id)?.is_none() {
            return Err(AppError::not_found("department", department_id));
        }

        let mut project = Project {
            id: 0,
            department_id,
            name: name.to_string(),
            status,
            estimated_hours,
            tasks: Vec::new(),
        };
        let tx = conn.unchecked_transaction()?;
        project.id = projects::insert_project(&tx, &project)?;
        audit(&tx, "project_add", &format!("project {}", project.id), name)?;
        tx.commit()?;
        Ok(project)
    }

    pub fn set_project_status(conn: &Connection, id: i64, status: ProjectStatus) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        if projects::update_project_status(&tx, id, status)? == 0 {
            return Err(AppError::not_found("project", id));
        }
        audit(&tx, "project_status", &format!("project {}", id), status.to_db_str())?;
        tx.commit()?;
        Ok(())
    }

    /// Progress, total and remaining hours, recomputed from the current tasks.
    pub fn project_report(conn: &Connection, id: i64) -> AppResult<ProjectReport> {
        let project =
            projects::load_project(conn, id)?.ok_or_else(|| AppError::not_found("project", id))?;

        Ok(ProjectReport {
            project_id: project.id,
            name: project.name.clone(),
            status: project.status,
            tasks: project.tasks.len(),
            progress: project_progress(&project),
            total_hours: project_total_hours(&project),
            estimated_hours: project.estimated_hours,
            remaining_hours: remaining_hours(&project),
        })
    }

    pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
        Ok(org::list_users(conn)?)
    }
}
