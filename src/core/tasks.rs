//! Task and subtask management.

use crate::core::calculator::progress::{remaining_hours, task_progress};
use crate::db::log::audit;
use crate::db::queries::{org, projects, tasks};
use crate::errors::{AppError, AppResult};
use crate::models::stats::TaskReport;
use crate::models::task::{Subtask, Task};
use crate::models::task_status::TaskStatus;
use rusqlite::Connection;

fn check_hours(label: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            label, value
        )));
    }
    Ok(())
}

fn require_task(conn: &Connection, id: i64) -> AppResult<Task> {
    tasks::load_task(conn, id)?.ok_or_else(|| AppError::not_found("task", id))
}

pub struct TaskLogic;

impl TaskLogic {
    /// Persist `task` together with one subtask per title.
    pub fn create(conn: &mut Connection, mut task: Task, subtask_titles: &[String]) -> AppResult<Task> {
        if task.title.trim().is_empty() {
            return Err(AppError::InvalidInput("task title cannot be empty".into()));
        }
        check_hours("hours", task.hours_worked)?;
        if let Some(est) = task.estimated_hours {
            check_hours("estimate", est)?;
        }

        let tx = conn.transaction()?;

        if !org::user_exists(&tx, task.user_id)? {
            return Err(AppError::not_found("user", task.user_id));
        }
        if let Some(pid) = task.project_id
            && !projects::project_exists(&tx, pid)?
        {
            return Err(AppError::not_found("project", pid));
        }

        task.subtasks = subtask_titles
            .iter()
            .map(|title| Subtask {
                id: 0,
                task_id: 0,
                title: title.clone(),
                is_completed: false,
            })
            .collect();

        let id = tasks::insert_task(&tx, &task)?;
        audit(
            &tx,
            "task_add",
            &format!("task {}", id),
            &format!("'{}' for user {} on {}", task.title, task.user_id, task.task_date),
        )?;

        let created = require_task(&tx, id)?;
        tx.commit()?;
        Ok(created)
    }

    pub fn set_status(conn: &Connection, id: i64, status: TaskStatus) -> AppResult<Task> {
        let tx = conn.unchecked_transaction()?;
        if tasks::update_task_status(&tx, id, status)? == 0 {
            return Err(AppError::not_found("task", id));
        }
        audit(&tx, "task_status", &format!("task {}", id), status.to_db_str())?;
        tx.commit()?;
        require_task(conn, id)
    }

    pub fn set_hours(conn: &Connection, id: i64, hours: f64) -> AppResult<Task> {
        check_hours("hours", hours)?;
        let tx = conn.unchecked_transaction()?;
        if tasks::update_task_hours(&tx, id, hours)? == 0 {
            return Err(AppError::not_found("task", id));
        }
        audit(&tx, "task_hours", &format!("task {}", id), &format!("{} h", hours))?;
        tx.commit()?;
        require_task(conn, id)
    }

    pub fn add_subtask(conn: &Connection, task_id: i64, title: &str) -> AppResult<Task> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("subtask title cannot be empty".into()));
        }
        let tx = conn.unchecked_transaction()?;
        if tasks::load_task(&tx, task_id)?.is_none() {
            return Err(AppError::not_found("task", task_id));
        }
        let subtask_id = tasks::insert_subtask(&tx, task_id, title, false)?;
        audit(
            &tx,
            "subtask_add",
            &format!("subtask {}", subtask_id),
            &format!("'{}' on task {}", title, task_id),
        )?;
        tx.commit()?;
        require_task(conn, task_id)
    }

    /// Mark a subtask (un)completed; returns the parent task.
    pub fn set_subtask_completed(conn: &Connection, subtask_id: i64, completed: bool) -> AppResult<Task> {
        let tx = conn.unchecked_transaction()?;
        let subtask = tasks::load_subtask(&tx, subtask_id)?
            .ok_or_else(|| AppError::not_found("subtask", subtask_id))?;
        tasks::set_subtask_completed(&tx, subtask_id, completed)?;
        audit(
            &tx,
            "subtask_done",
            &format!("subtask {}", subtask_id),
            if completed { "completed" } else { "reopened" },
        )?;
        tx.commit()?;
        require_task(conn, subtask.task_id)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        if tasks::delete_task(&tx, id)? == 0 {
            return Err(AppError::not_found("task", id));
        }
        audit(&tx, "task_del", &format!("task {}", id), "deleted with its subtasks")?;
        tx.commit()?;
        Ok(())
    }

    pub fn report(conn: &Connection, id: i64) -> AppResult<TaskReport> {
        let task = require_task(conn, id)?;
        Ok(TaskReport {
            progress: task_progress(&task),
            remaining_hours: remaining_hours(&task),
            task,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::count_operation;
    use chrono::NaiveDate;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        init_db(&conn).unwrap();
        org::insert_user(&conn, "ann", None).unwrap();
        conn
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 7).unwrap()
    }

    #[test]
    fn progress_follows_subtask_completion() {
        let mut conn = setup();
        let subs: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let task = TaskLogic::create(&mut conn, Task::new(1, "ship", day()), &subs).unwrap();
        assert_eq!(task.subtasks.len(), 4);
        assert_eq!(TaskLogic::report(&conn, task.id).unwrap().progress, 0.0);

        let first = task.subtasks[0].id;
        TaskLogic::set_subtask_completed(&conn, first, true).unwrap();
        assert_eq!(TaskLogic::report(&conn, task.id).unwrap().progress, 25.0);

        TaskLogic::set_subtask_completed(&conn, first, false).unwrap();
        assert_eq!(TaskLogic::report(&conn, task.id).unwrap().progress, 0.0);
    }

    #[test]
    fn deleting_a_task_removes_its_subtasks() {
        let mut conn = setup();
        let task = TaskLogic::create(&mut conn, Task::new(1, "x", day()), &["s".to_string()]).unwrap();
        let sub_id = task.subtasks[0].id;

        TaskLogic::delete(&conn, task.id).unwrap();
        assert!(tasks::load_subtask(&conn, sub_id).unwrap().is_none());
        assert!(matches!(
            TaskLogic::delete(&conn, task.id),
            Err(AppError::NotFound { kind: "task", .. })
        ));
    }

    #[test]
    fn unknown_references_are_not_found() {
        let mut conn = setup();
        let err = TaskLogic::create(&mut conn, Task::new(99, "x", day()), &[]).unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "user", id: 99 }));

        let mut t = Task::new(1, "x", day());
        t.project_id = Some(5);
        let err = TaskLogic::create(&mut conn, t, &[]).unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "project", id: 5 }));

        assert!(TaskLogic::set_status(&conn, 42, TaskStatus::Done).is_err());
    }

    #[test]
    fn negative_hours_are_rejected() {
        let mut conn = setup();
        let task = TaskLogic::create(&mut conn, Task::new(1, "x", day()), &[]).unwrap();
        assert!(matches!(
            TaskLogic::set_hours(&conn, task.id, -1.0),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(TaskLogic::set_hours(&conn, task.id, 2.25).unwrap().hours_worked, 2.25);
    }

    #[test]
    fn subtask_changes_are_audited() {
        let mut conn = setup();
        let task = TaskLogic::create(&mut conn, Task::new(1, "x", day()), &[]).unwrap();
        let task = TaskLogic::add_subtask(&conn, task.id, "write docs").unwrap();
        let sub_id = task.subtasks[0].id;
        TaskLogic::set_subtask_completed(&conn, sub_id, true).unwrap();
        TaskLogic::set_subtask_completed(&conn, sub_id, false).unwrap();

        assert_eq!(count_operation(&conn, "subtask_add").unwrap(), 1);
        assert_eq!(count_operation(&conn, "subtask_done").unwrap(), 2);
    }

    #[test]
    fn a_failed_audit_write_rolls_back_the_change() {
        let mut conn = setup();
        let task = TaskLogic::create(&mut conn, Task::new(1, "x", day()), &["s".to_string()]).unwrap();
        conn.execute_batch("DROP TABLE log").unwrap();

        assert!(TaskLogic::set_status(&conn, task.id, TaskStatus::Done).is_err());
        assert!(TaskLogic::set_hours(&conn, task.id, 3.0).is_err());
        assert!(TaskLogic::add_subtask(&conn, task.id, "more").is_err());
        assert!(TaskLogic::set_subtask_completed(&conn, task.subtasks[0].id, true).is_err());
        assert!(TaskLogic::delete(&conn, task.id).is_err());

        let stored = tasks::load_task(&conn, task.id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Todo);
        assert_eq!(stored.hours_worked, 0.0);
        assert_eq!(stored.subtasks.len(), 1);
        assert!(!stored.subtasks[0].is_completed);
    }
}
