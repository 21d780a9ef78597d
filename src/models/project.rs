use super::task::Task;
use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "not_started",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(ProjectStatus::NotStarted),
            "in_progress" => Some(ProjectStatus::InProgress),
            "completed" => Some(ProjectStatus::Completed),
            "archived" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }

    /// Case-insensitive, `-` allowed for `_`.
    pub fn parse(input: &str) -> AppResult<Self> {
        let norm = input.trim().to_lowercase().replace('-', "_");
        Self::from_db_str(&norm).ok_or_else(|| AppError::InvalidStatus(input.to_string()))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::InProgress)
    }
}

/// A project with its tasks loaded. Progress and total hours are never
/// stored: see `core::calculator::progress`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub estimated_hours: Option<f64>,
    pub tasks: Vec<Task>,
}
