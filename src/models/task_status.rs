use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Canonical task status.
///
/// Two vocabularies exist for task status: the employee-facing
/// `todo / in_progress / done` and a legacy `pending / in_progress / completed`
/// used when a task is first sent to a user. Only the former is stored or
/// printed; the latter is accepted on input through [`TaskStatus::from_legacy`]:
///
/// | legacy        | canonical     |
/// |---------------|---------------|
/// | `pending`     | `todo`        |
/// | `in_progress` | `in_progress` |
/// | `completed`   | `done`        |
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Convert canonical DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Map a legacy status value onto the canonical set.
    pub fn from_legacy(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Accept either vocabulary (case-insensitive, `-` allowed for `_`).
    pub fn parse(input: &str) -> AppResult<Self> {
        let norm = input.trim().to_lowercase().replace('-', "_");
        Self::from_db_str(&norm)
            .or_else(|| Self::from_legacy(&norm))
            .ok_or_else(|| AppError::InvalidStatus(input.to_string()))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_values_map_to_canonical() {
        assert_eq!(TaskStatus::parse("pending").unwrap(), TaskStatus::Todo);
        assert_eq!(TaskStatus::parse("completed").unwrap(), TaskStatus::Done);
        assert_eq!(
            TaskStatus::parse("In-Progress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(TaskStatus::parse("done").unwrap().to_db_str(), "done");
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!(matches!(
            TaskStatus::parse("archived"),
            Err(AppError::InvalidStatus(_))
        ));
        assert_eq!(TaskStatus::from_db_str("pending"), None);
    }
}
