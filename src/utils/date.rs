//! Command-line date and timestamp parsing.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Parse an RFC 3339 instant, or a local `YYYY-MM-DD HH:MM[:SS]` read in `tz`.
pub fn parse_timestamp(s: &str, tz: FixedOffset) -> AppResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let local = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))?;

    tz.from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

/// `--at`/`--now` value, or the current instant when omitted.
pub fn timestamp_or_now(s: Option<&str>, tz: FixedOffset) -> AppResult<DateTime<Utc>> {
    match s {
        Some(v) => parse_timestamp(v, tz),
        None => Ok(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_timestamps_use_the_offset() {
        let plus_two = FixedOffset::east_opt(7200).unwrap();
        let t = parse_timestamp("2025-04-07 09:00", plus_two).unwrap();
        assert_eq!(t.to_rfc3339(), "2025-04-07T07:00:00+00:00");
    }

    #[test]
    fn rfc3339_ignores_the_offset_argument() {
        let plus_two = FixedOffset::east_opt(7200).unwrap();
        let t = parse_timestamp("2025-04-07T09:00:00Z", plus_two).unwrap();
        assert_eq!(t.to_rfc3339(), "2025-04-07T09:00:00+00:00");
    }

    #[test]
    fn garbage_is_rejected() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(parse_timestamp("yesterday", utc), Err(AppError::InvalidTime(_))));
        assert!(matches!(parse_date("2025-13-01"), Err(AppError::InvalidDate(_))));
    }
}
