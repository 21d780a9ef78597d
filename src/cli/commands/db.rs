use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::count_operation;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};
use ansi_term::Colour::{Cyan, Yellow};
use rusqlite::Connection;
use std::fs;

const COUNTED_TABLES: &[&str] = &[
    "departments",
    "users",
    "projects",
    "tasks",
    "subtasks",
    "time_sessions",
];

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info: show_info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            info("Running migrations…");
            let applied = run_pending_migrations(&pool.conn)?;
            if applied.is_empty() {
                success("Database already up to date.");
            } else {
                for v in &applied {
                    println!("  • {}", v);
                }
                success(format!("{} migration(s) applied.", applied.len()));
            }
        }

        if *show_info {
            print_db_info(&pool.conn, &cfg.database)?;
        }

        if *check {
            info("Running integrity check…");
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                error(format!("Integrity check failed: {}", integrity));
            }
        }
    }

    Ok(())
}

fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{} {}", Cyan.paint("• File:"), Yellow.paint(db_path));
    println!("{} {:.2} MB", Cyan.paint("• Size:"), file_mb);

    for table in COUNTED_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            println!("{} --", Cyan.paint(format!("• {}:", table)));
            continue;
        }
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        println!("{} {}", Cyan.paint(format!("• {}:", table)), n);
    }

    let open: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM time_sessions WHERE clock_out IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    println!("{} {}", Cyan.paint("• Open sessions:"), open);
    println!(
        "{} {}",
        Cyan.paint("• Migrations applied:"),
        count_operation(conn, "migration_applied").unwrap_or(0)
    );
    println!();

    Ok(())
}
