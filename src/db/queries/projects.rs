use super::conversion_error;
use super::tasks::tasks_for_project;
use crate::errors::AppError;
use crate::models::project::{Project, ProjectStatus};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str = "id, department_id, name, status, estimated_hours";

/// Map a `projects` row (tasks are not loaded here).
pub fn map_project(row: &Row) -> Result<Project> {
    let status_str: String = row.get("status")?;
    let status = ProjectStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidStatus(status_str.clone())))?;

    Ok(Project {
        id: row.get("id")?,
        department_id: row.get("department_id")?,
        name: row.get("name")?,
        status,
        estimated_hours: row.get("estimated_hours")?,
        tasks: Vec::new(),
    })
}

pub fn insert_project(conn: &Connection, p: &Project) -> Result<i64> {
    conn.execute(
        "INSERT INTO projects (department_id, name, status, estimated_hours)
         VALUES (?1, ?2, ?3, ?4)",
        params![p.department_id, p.name, p.status.to_db_str(), p.estimated_hours],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_project_status(conn: &Connection, id: i64, status: ProjectStatus) -> Result<usize> {
    conn.execute(
        "UPDATE projects SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )
}

/// The project with all its tasks (and their subtasks).
pub fn load_project(conn: &Connection, id: i64) -> Result<Option<Project>> {
    match load_project_header(conn, id)? {
        Some(mut p) => {
            p.tasks = tasks_for_project(conn, p.id)?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

/// The project row alone, without tasks.
pub fn load_project_header(conn: &Connection, id: i64) -> Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
        [id],
        map_project,
    )
    .optional()
}

pub fn project_exists(conn: &Connection, id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM projects WHERE id = ?1")?;
    stmt.exists([id])
}

/// All projects of a department, each with its tasks.
pub fn projects_for_department(conn: &Connection, department_id: i64) -> Result<Vec<Project>> {
    let projects: Vec<Project> = {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects WHERE department_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([department_id], map_project)?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    projects
        .into_iter()
        .map(|mut p| {
            p.tasks = tasks_for_project(conn, p.id)?;
            Ok(p)
        })
        .collect()
}
