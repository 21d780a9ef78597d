use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardLogic;
use crate::errors::{AppError, AppResult};
use crate::models::stats::{TaskProgressRow, TimeStats, WeekOverview};
use crate::ui::messages::header;
use crate::utils::date::{parse_date, timestamp_or_now};
use crate::utils::formatting::{bold, format_hours, pad_right, round_hours};
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct EmployeeDashboard<'a> {
    user_id: i64,
    stats: TimeStats,
    tasks: &'a [TaskProgressRow],
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::from(io::Error::other(format!("JSON serialization error: {e}"))))
}

/// Copy of `stats` rounded for presentation.
fn rounded(stats: TimeStats, decimals: usize) -> TimeStats {
    TimeStats {
        today: round_hours(stats.today, decimals),
        this_week: round_hours(stats.this_week, decimals),
        this_month: round_hours(stats.this_month, decimals),
    }
}

fn rounded_rows(rows: &[TaskProgressRow], decimals: usize) -> Vec<TaskProgressRow> {
    rows.iter()
        .cloned()
        .map(|mut r| {
            r.hours_worked = round_hours(r.hours_worked, decimals);
            r
        })
        .collect()
}

fn rounded_week(mut w: WeekOverview, decimals: usize) -> WeekOverview {
    w.total_task_hours = round_hours(w.total_task_hours, decimals);
    for u in &mut w.session_hours {
        u.hours = round_hours(u.hours, decimals);
    }
    w
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard {
        user,
        week,
        now,
        tasks,
        json,
    } = cmd
    {
        let pool = super::open_pool(cfg)?;
        let tz = cfg.offset()?;
        let decimals = cfg.hours_decimals;

        if let Some(week) = week {
            let overview = DashboardLogic::week_overview(&pool.conn, parse_date(week)?, tz)?;
            if *json {
                println!("{}", to_json(&rounded_week(overview, decimals))?);
            } else {
                print_week(&overview, decimals);
            }
            return Ok(());
        }

        let Some(user_id) = *user else {
            return Err(AppError::InvalidInput("a user id or --week is required".into()));
        };

        let now = timestamp_or_now(now.as_deref(), tz)?;
        let stats = DashboardLogic::summarize(&pool.conn, user_id, now, tz)?;
        let rows = DashboardLogic::employee_tasks(&pool.conn, user_id, *tasks)?;

        if *json {
            let tasks = rounded_rows(&rows, decimals);
            let out = EmployeeDashboard {
                user_id,
                stats: rounded(stats, decimals),
                tasks: &tasks,
            };
            println!("{}", to_json(&out)?);
            return Ok(());
        }

        header(format!("Dashboard for user {}", user_id));
        println!("Today      : {}", format_hours(stats.today, decimals));
        println!("This week  : {}", format_hours(stats.this_week, decimals));
        println!("This month : {}", format_hours(stats.this_month, decimals));

        if !rows.is_empty() {
            println!("\n{}", bold("Recent tasks"));
            for r in &rows {
                println!(
                    "  {} {} {} {:>6.2}%  {}",
                    pad_right(&r.id.to_string(), 5),
                    pad_right(&r.title, 28),
                    pad_right(r.status.to_db_str(), 12),
                    r.progress,
                    r.project.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn print_week(w: &WeekOverview, decimals: usize) {
    header(format!("Week {} → {}", w.week_start, w.week_end));
    println!("Task hours       : {}", format_hours(w.total_task_hours, decimals));
    println!("Tasks            : {}", w.total_tasks);
    println!("Completed tasks  : {}", w.completed_tasks);
    println!("Active employees : {}", w.active_employees);

    if !w.session_hours.is_empty() {
        println!("\n{}", bold("Clocked hours"));
        for u in &w.session_hours {
            println!(
                "  {} {}",
                pad_right(&format!("{} ({})", u.name, u.user_id), 28),
                format_hours(u.hours, decimals)
            );
        }
    }
}
