use super::task_status::TaskStatus;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Subtask {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub project_id: Option<i64>, // ⇔ tasks.project_id (nullable until attached)
    pub user_id: i64,
    pub title: String,
    pub task_date: NaiveDate, // ⇔ tasks.task_date (TEXT "YYYY-MM-DD")
    pub hours_worked: f64,
    pub estimated_hours: Option<f64>,
    pub status: TaskStatus,
    pub subtasks: Vec<Subtask>, // ordered by id
}

impl Task {
    /// A task that has not been persisted yet (`id = 0`, no subtasks).
    pub fn new(user_id: i64, title: &str, task_date: NaiveDate) -> Self {
        Self {
            id: 0,
            project_id: None,
            user_id,
            title: title.to_string(),
            task_date,
            hours_worked: 0.0,
            estimated_hours: None,
            status: TaskStatus::Todo,
            subtasks: Vec::new(),
        }
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.is_completed).count()
    }
}
