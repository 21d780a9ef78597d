use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Base schema. Every statement is idempotent.
///
/// `tasks.status` also admits legacy values; `migrate_canonical_task_status`
/// rewrites them.
fn create_base_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            name   TEXT NOT NULL UNIQUE,
            color  TEXT NOT NULL DEFAULT '#4A5568'
        );

        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            department_id INTEGER REFERENCES departments(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            department_id   INTEGER NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
            status          TEXT NOT NULL DEFAULT 'not_started'
                            CHECK(status IN ('not_started','in_progress','completed','archived')),
            estimated_hours REAL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id      INTEGER REFERENCES projects(id) ON DELETE CASCADE,
            user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title           TEXT NOT NULL,
            task_date       TEXT NOT NULL,
            hours_worked    REAL NOT NULL DEFAULT 0,
            estimated_hours REAL,
            status          TEXT NOT NULL DEFAULT 'todo'
        );

        CREATE TABLE IF NOT EXISTS subtasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id      INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            title        TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS time_sessions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            clock_in     TEXT NOT NULL,
            clock_out    TEXT,
            hours_worked REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_user_date ON tasks(user_id, task_date);
        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        CREATE INDEX IF NOT EXISTS idx_subtasks_task ON subtasks(task_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_in ON time_sessions(user_id, clock_in);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Rewrite legacy task statuses (pending/completed) to the canonical set.
fn migrate_canonical_task_status(conn: &Connection) -> Result<usize> {
    let pending = conn.execute("UPDATE tasks SET status = 'todo' WHERE status = 'pending'", [])?;
    let completed = conn.execute(
        "UPDATE tasks SET status = 'done' WHERE status = 'completed'",
        [],
    )?;
    Ok(pending + completed)
}

/// Storage backstop for "at most one open session per user".
fn migrate_single_open_session_index(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_open
         ON time_sessions(user_id) WHERE clock_out IS NULL;",
    )?;
    Ok(0)
}

type MigrationFn = fn(&Connection) -> Result<usize>;

const MIGRATIONS: &[(&str, &str, MigrationFn)] = &[
    (
        "20250406_0001_canonical_task_status",
        "Mapped legacy task statuses to todo/in_progress/done",
        migrate_canonical_task_status,
    ),
    (
        "20250407_0002_single_open_session_index",
        "Added unique index on open time sessions",
        migrate_single_open_session_index,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db(). Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    create_base_schema(conn)?;

    let mut applied = Vec::new();

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        let rows = apply(&tx).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;
        mark_applied(&tx, version, &format!("{} ({} rows)", message, rows))?;
        tx.commit()?;

        applied.push(*version);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let first = run_pending_migrations(&conn).unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());
        let second = run_pending_migrations(&conn).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn legacy_statuses_are_rewritten() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        create_base_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (name) VALUES ('ann');
             INSERT INTO tasks (user_id, title, task_date, status) VALUES (1, 'a', '2025-04-07', 'pending');
             INSERT INTO tasks (user_id, title, task_date, status) VALUES (1, 'b', '2025-04-07', 'completed');
             INSERT INTO tasks (user_id, title, task_date, status) VALUES (1, 'c', '2025-04-07', 'in_progress');",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        let statuses: Vec<String> = conn
            .prepare("SELECT status FROM tasks ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(statuses, vec!["todo", "done", "in_progress"]);
    }
}
