//! Formatting utilities used for CLI output.

use chrono::Duration;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Hours are kept at full precision and rounded only here.
pub fn round_hours(hours: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (hours * factor).round() / factor
}

pub fn format_hours(hours: f64, decimals: usize) -> String {
    format!("{:.*} h", decimals, round_hours(hours, decimals))
}

/// Elapsed time as HH:MM:SS (negative durations print as 00:00:00).
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
