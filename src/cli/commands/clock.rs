use crate::cli::parser::ClockAction;
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::date::{parse_timestamp, timestamp_or_now};
use crate::utils::formatting::{format_elapsed, format_hours, pad_right};
use chrono::{DateTime, FixedOffset, Utc};

fn local(ts: DateTime<Utc>, tz: FixedOffset) -> String {
    ts.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

pub fn handle(action: &ClockAction, cfg: &Config) -> AppResult<()> {
    let mut pool = super::open_pool(cfg)?;
    let tz = cfg.offset()?;
    let decimals = cfg.hours_decimals;

    match action {
        ClockAction::In { user, at } => {
            let at = timestamp_or_now(at.as_deref(), tz)?;
            let session = pool.with_conn(|conn| ClockLogic::clock_in(conn, *user, at))?;
            success(format!(
                "User {} clocked in at {} (session {})",
                user,
                local(session.clock_in, tz),
                session.id
            ));
        }
        ClockAction::Out { user, at } => {
            let at = timestamp_or_now(at.as_deref(), tz)?;
            let session = pool.with_conn(|conn| ClockLogic::clock_out(conn, *user, at))?;
            success(format!(
                "User {} clocked out at {}: {} worked",
                user,
                local(at, tz),
                format_hours(session.hours_worked, decimals)
            ));
        }
        ClockAction::Status { user, now } => {
            let status = ClockLogic::current_status(&pool.conn, *user)?;
            match status.clock_in_time {
                Some(since) => {
                    let now = timestamp_or_now(now.as_deref(), tz)?;
                    info(format!(
                        "User {} clocked in since {} ({} elapsed)",
                        user,
                        local(since, tz),
                        format_elapsed(now - since)
                    ));
                }
                None => info(format!("User {} is not clocked in", user)),
            }
        }
        ClockAction::Fix {
            session,
            clock_in,
            clock_out,
        } => {
            let clock_in = clock_in.as_deref().map(|s| parse_timestamp(s, tz)).transpose()?;
            let clock_out = clock_out.as_deref().map(|s| parse_timestamp(s, tz)).transpose()?;

            let fixed =
                pool.with_conn(|conn| ClockLogic::correct_session(conn, *session, clock_in, clock_out))?;
            success(format!(
                "Session {} corrected: {} worked",
                fixed.id,
                format_hours(fixed.hours_worked, decimals)
            ));
        }
        ClockAction::List { user, limit } => {
            let sessions = ClockLogic::list_sessions(&pool.conn, *user, *limit)?;
            if sessions.is_empty() {
                info(format!("No sessions for user {}", user));
                return Ok(());
            }

            println!(
                "{} {} {} HOURS",
                pad_right("ID", 6),
                pad_right("IN", 27),
                pad_right("OUT", 27)
            );
            for s in sessions {
                let out = s.clock_out.map(|o| local(o, tz)).unwrap_or_else(|| "(open)".into());
                println!(
                    "{} {} {} {}",
                    pad_right(&s.id.to_string(), 6),
                    pad_right(&local(s.clock_in, tz), 27),
                    pad_right(&out, 27),
                    format_hours(s.hours_worked, decimals)
                );
            }
        }
    }

    Ok(())
}
