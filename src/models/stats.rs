//! Read-side aggregates handed back to the CLI (or any other presenter).
//! Hours are kept at full precision; rounding happens when printing.

use super::task_status::TaskStatus;
use chrono::NaiveDate;
use serde::Serialize;

/// Employee dashboard: hours booked on tasks per period window.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct TimeStats {
    pub today: f64,
    pub this_week: f64,
    pub this_month: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskProgressRow {
    pub id: i64,
    pub title: String,
    pub project: Option<String>,
    pub status: TaskStatus,
    pub hours_worked: f64,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserHours {
    pub user_id: i64,
    pub name: String,
    pub hours: f64,
}

/// Admin dashboard for one Monday-Sunday week.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeekOverview {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_task_hours: f64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub active_employees: usize,
    pub session_hours: Vec<UserHours>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentStats {
    pub department_id: i64,
    pub name: String,
    pub team_size: usize,
    pub projects_count: usize,
    pub active_projects_count: usize,
    pub progress: u8,
    pub monthly_hours: f64,
}

/// A task with its derived figures.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskReport {
    pub task: super::task::Task,
    pub progress: f64,
    pub remaining_hours: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectReport {
    pub project_id: i64,
    pub name: String,
    pub status: super::project::ProjectStatus,
    pub tasks: usize,
    pub progress: u8,
    pub total_hours: f64,
    pub estimated_hours: Option<f64>,
    pub remaining_hours: f64,
}
