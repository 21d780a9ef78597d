use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 60;

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").unwrap_or_else(|e| panic!("invalid ANSI pattern: {e}"))
});

fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Colour of an audit operation in `log --print`.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "clock_fix" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.ends_with("_del") => Colour::Red,
        other if other.starts_with("task_") => Colour::Blue,
        other if other.starts_with("project_") || other.starts_with("dept_") => Colour::Blue,
        _ => Colour::White,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// All audit rows, oldest first. `limit` keeps only the newest N.
    pub fn entries(pool: &mut DbPool, limit: Option<usize>) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = rows.collect::<Result<Vec<_>, _>>()?;
        if let Some(n) = limit
            && entries.len() > n
        {
            let cut = entries.len() - n;
            entries.drain(..cut);
        }
        Ok(entries)
    }

    pub fn print_log(pool: &mut DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = Self::entries(pool, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_target = |e: &LogEntry| {
            if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            }
        };

        let op_w = entries
            .iter()
            .map(|e| op_target(e).len())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let color = color_for_operation(&e.operation);

            let visible = op_target(e);
            let visible = if visible.len() > MAX_OP_WIDTH {
                let mut s = visible.chars().take(MAX_OP_WIDTH - 3).collect::<String>();
                s.push_str("...");
                s
            } else {
                visible
            };

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).len()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::audit;

    #[test]
    fn limit_keeps_newest_rows() {
        let mut pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        for i in 0..5 {
            audit(&pool.conn, "clock_in", "user 1", &format!("row {i}")).unwrap();
        }

        let all = LogLogic::entries(&mut pool, None).unwrap();
        let last_two = LogLogic::entries(&mut pool, Some(2)).unwrap();
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[1], all[all.len() - 1]);
        assert_eq!(last_two[1].message, "row 4");
    }

    #[test]
    fn ansi_is_stripped() {
        let painted = Colour::Red.paint("clock_in").to_string();
        assert_eq!(strip_ansi(&painted), "clock_in");
    }
}
