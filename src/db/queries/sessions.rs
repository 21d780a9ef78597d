use super::{conversion_error, ts_from_db, ts_to_db};
use crate::errors::AppError;
use crate::models::time_session::TimeSession;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str = "id, user_id, clock_in, clock_out, hours_worked";

pub fn map_session(row: &Row) -> Result<TimeSession> {
    let clock_in_str: String = row.get("clock_in")?;
    let clock_out_str: Option<String> = row.get("clock_out")?;

    let clock_in = ts_from_db(2, &clock_in_str)?;
    let clock_out = clock_out_str
        .as_deref()
        .map(|s| ts_from_db(3, s))
        .transpose()?;

    let hours_worked: f64 = row.get("hours_worked")?;
    if hours_worked < 0.0 {
        return Err(conversion_error(
            4,
            AppError::InvalidInput(format!("negative hours_worked {}", hours_worked)),
        ));
    }

    Ok(TimeSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        clock_in,
        clock_out,
        hours_worked,
    })
}

/// Insert a new session and return its id.
pub fn insert_session(conn: &Connection, s: &TimeSession) -> Result<i64> {
    conn.execute(
        "INSERT INTO time_sessions (user_id, clock_in, clock_out, hours_worked)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            s.user_id,
            ts_to_db(&s.clock_in),
            s.clock_out.as_ref().map(ts_to_db),
            s.hours_worked,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Write clock-in, clock-out and hours in a single statement.
pub fn update_session(conn: &Connection, s: &TimeSession) -> Result<usize> {
    conn.execute(
        "UPDATE time_sessions
         SET clock_in = ?1, clock_out = ?2, hours_worked = ?3
         WHERE id = ?4",
        params![
            ts_to_db(&s.clock_in),
            s.clock_out.as_ref().map(ts_to_db),
            s.hours_worked,
            s.id,
        ],
    )
}

pub fn load_session(conn: &Connection, id: i64) -> Result<Option<TimeSession>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM time_sessions WHERE id = ?1"),
        [id],
        map_session,
    )
    .optional()
}

/// The user's open session, latest by clock-in.
pub fn find_open_session(conn: &Connection, user_id: i64) -> Result<Option<TimeSession>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE user_id = ?1 AND clock_out IS NULL
             ORDER BY clock_in DESC
             LIMIT 1"
        ),
        [user_id],
        map_session,
    )
    .optional()
}

/// First session of `user_id` (other than `exclude_id`) that shares time with
/// `[start, end)`; `end = None` stands for a still-open interval.
/// Intervals that only touch at a boundary do not overlap.
pub fn find_overlapping_session(
    conn: &Connection,
    user_id: i64,
    exclude_id: Option<i64>,
    start: &DateTime<Utc>,
    end: Option<&DateTime<Utc>>,
) -> Result<Option<TimeSession>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE user_id = ?1
               AND id != ?2
               AND (clock_out IS NULL OR clock_out > ?3)
               AND (?4 IS NULL OR clock_in < ?4)
             ORDER BY clock_in ASC
             LIMIT 1"
        ),
        params![
            user_id,
            exclude_id.unwrap_or(0),
            ts_to_db(start),
            end.map(ts_to_db),
        ],
        map_session,
    )
    .optional()
}

pub fn count_open_sessions(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM time_sessions WHERE user_id = ?1 AND clock_out IS NULL",
        [user_id],
        |row| row.get(0),
    )
}

/// Most recent first.
pub fn list_sessions(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<TimeSession>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM time_sessions
         WHERE user_id = ?1
         ORDER BY clock_in DESC, id DESC
         LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![user_id, limit as i64], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions of any user whose clock-in lies in `[from, to]`.
pub fn sessions_between(
    conn: &Connection,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<TimeSession>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM time_sessions
         WHERE clock_in >= ?1 AND clock_in <= ?2
         ORDER BY user_id ASC, clock_in ASC"
    ))?;

    let rows = stmt.query_map(params![ts_to_db(from), ts_to_db(to)], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
