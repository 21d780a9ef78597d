use super::{conversion_error, date_from_db, date_to_db};
use crate::errors::AppError;
use crate::models::task::{Subtask, Task};
use crate::models::task_status::TaskStatus;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str =
    "id, project_id, user_id, title, task_date, hours_worked, estimated_hours, status";

/// Map a `tasks` row. Subtasks are attached separately by `with_subtasks`.
pub fn map_task(row: &Row) -> Result<Task> {
    let date_str: String = row.get("task_date")?;
    let task_date = date_from_db(4, &date_str)?;

    // Legacy values still present in an unmigrated DB are mapped, not rejected.
    let status_str: String = row.get("status")?;
    let status = TaskStatus::parse(&status_str)
        .map_err(|_| conversion_error(7, AppError::InvalidStatus(status_str.clone())))?;

    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        task_date,
        hours_worked: row.get("hours_worked")?,
        estimated_hours: row.get("estimated_hours")?,
        status,
        subtasks: Vec::new(),
    })
}

pub fn map_subtask(row: &Row) -> Result<Subtask> {
    Ok(Subtask {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        title: row.get("title")?,
        is_completed: row.get::<_, i32>("is_completed")? == 1,
    })
}

/// Insert the task row and its subtasks; returns the new task id.
pub fn insert_task(conn: &Connection, t: &Task) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasks (project_id, user_id, title, task_date, hours_worked, estimated_hours, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            t.project_id,
            t.user_id,
            t.title,
            date_to_db(&t.task_date),
            t.hours_worked,
            t.estimated_hours,
            t.status.to_db_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();

    for s in &t.subtasks {
        insert_subtask(conn, id, &s.title, s.is_completed)?;
    }

    Ok(id)
}

pub fn insert_subtask(conn: &Connection, task_id: i64, title: &str, completed: bool) -> Result<i64> {
    conn.execute(
        "INSERT INTO subtasks (task_id, title, is_completed) VALUES (?1, ?2, ?3)",
        params![task_id, title, if completed { 1 } else { 0 }],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_subtask_completed(conn: &Connection, subtask_id: i64, completed: bool) -> Result<usize> {
    conn.execute(
        "UPDATE subtasks SET is_completed = ?1 WHERE id = ?2",
        params![if completed { 1 } else { 0 }, subtask_id],
    )
}

pub fn load_subtask(conn: &Connection, subtask_id: i64) -> Result<Option<Subtask>> {
    conn.query_row(
        "SELECT id, task_id, title, is_completed FROM subtasks WHERE id = ?1",
        [subtask_id],
        map_subtask,
    )
    .optional()
}

pub fn load_subtasks(conn: &Connection, task_id: i64) -> Result<Vec<Subtask>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, task_id, title, is_completed FROM subtasks
         WHERE task_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([task_id], map_subtask)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_task_status(conn: &Connection, id: i64, status: TaskStatus) -> Result<usize> {
    conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )
}

pub fn update_task_hours(conn: &Connection, id: i64, hours: f64) -> Result<usize> {
    conn.execute(
        "UPDATE tasks SET hours_worked = ?1 WHERE id = ?2",
        params![hours, id],
    )
}

/// Subtasks go with it (ON DELETE CASCADE).
pub fn delete_task(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM tasks WHERE id = ?1", [id])
}

pub fn load_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
            [id],
            map_task,
        )
        .optional()?;

    match task {
        Some(t) => Ok(Some(with_subtasks(conn, t)?)),
        None => Ok(None),
    }
}

pub fn tasks_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>> {
    query_tasks(
        conn,
        &format!("SELECT {COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY id ASC"),
        params![project_id],
    )
}

/// Tasks of one user dated in `[from, to]`.
pub fn tasks_for_user_between(
    conn: &Connection,
    user_id: i64,
    from: &NaiveDate,
    to: &NaiveDate,
) -> Result<Vec<Task>> {
    query_tasks(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = ?1 AND task_date >= ?2 AND task_date <= ?3
             ORDER BY task_date ASC, id ASC"
        ),
        params![user_id, date_to_db(from), date_to_db(to)],
    )
}

/// Tasks of every user dated in `[from, to]`.
pub fn tasks_between(conn: &Connection, from: &NaiveDate, to: &NaiveDate) -> Result<Vec<Task>> {
    query_tasks(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE task_date >= ?1 AND task_date <= ?2
             ORDER BY task_date ASC, id ASC"
        ),
        params![date_to_db(from), date_to_db(to)],
    )
}

/// The user's latest tasks that are in progress or done.
pub fn recent_active_tasks(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<Task>> {
    query_tasks(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = ?1 AND status IN ('in_progress', 'done')
             ORDER BY task_date DESC, id DESC
             LIMIT ?2"
        ),
        params![user_id, limit as i64],
    )
}

fn query_tasks(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_task)?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    tasks.into_iter().map(|t| with_subtasks(conn, t)).collect()
}

fn with_subtasks(conn: &Connection, mut task: Task) -> Result<Task> {
    task.subtasks = load_subtasks(conn, task.id)?;
    Ok(task)
}
