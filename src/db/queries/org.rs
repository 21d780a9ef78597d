//! Users and departments.

use crate::models::department::{Department, User};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        department_id: row.get("department_id")?,
    })
}

pub fn map_department(row: &Row) -> Result<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}

pub fn insert_user(conn: &Connection, name: &str, department_id: Option<i64>) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (name, department_id) VALUES (?1, ?2)",
        params![name, department_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn user_exists(conn: &Connection, id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM users WHERE id = ?1")?;
    stmt.exists([id])
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, department_id FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn users_in_department(conn: &Connection, department_id: i64) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, department_id FROM users
         WHERE department_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([department_id], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_department(conn: &Connection, name: &str, color: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO departments (name, color) VALUES (?1, ?2)",
        params![name, color],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_department(conn: &Connection, id: i64) -> Result<Option<Department>> {
    conn.query_row(
        "SELECT id, name, color FROM departments WHERE id = ?1",
        [id],
        map_department,
    )
    .optional()
}

pub fn delete_department(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM departments WHERE id = ?1", [id])
}
