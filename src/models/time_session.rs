use crate::core::calculator::hours::hours_between;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One user's continuous work interval.
///
/// `hours_worked` is derived from `clock_in`/`clock_out` and only ever changes
/// through [`TimeSession::close`] or [`TimeSession::correct`], which re-derive
/// it from the final pair of instants.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSession {
    pub id: i64,
    pub user_id: i64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub hours_worked: f64,
}

impl TimeSession {
    /// A new open session (not yet persisted, `id = 0`).
    pub fn open(user_id: i64, at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id,
            clock_in: at,
            clock_out: None,
            hours_worked: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Set clock-out and hours together. Leaves `self` untouched on error.
    pub fn close(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        let hours = checked_hours(self.clock_in, at)?;
        self.clock_out = Some(at);
        self.hours_worked = hours;
        Ok(())
    }

    /// Admin correction: replace either boundary and re-derive hours.
    pub fn correct(
        &mut self,
        clock_in: Option<DateTime<Utc>>,
        clock_out: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let new_in = clock_in.unwrap_or(self.clock_in);
        let new_out = clock_out.or(self.clock_out);

        let hours = match new_out {
            Some(out) => checked_hours(new_in, out)?,
            None => 0.0,
        };

        self.clock_in = new_in;
        self.clock_out = new_out;
        self.hours_worked = hours;
        Ok(())
    }
}

fn checked_hours(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> AppResult<f64> {
    if clock_out <= clock_in {
        return Err(AppError::InvalidInterval {
            clock_in: clock_in.to_rfc3339(),
            clock_out: clock_out.to_rfc3339(),
        });
    }
    Ok(hours_between(clock_in, clock_out))
}

/// Read-only clock status for one user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClockStatus {
    pub is_clocked_in: bool,
    pub clock_in_time: Option<DateTime<Utc>>,
}

impl ClockStatus {
    pub fn from_open_session(open: Option<&TimeSession>) -> Self {
        Self {
            is_clocked_in: open.is_some(),
            clock_in_time: open.map(|s| s.clock_in),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 7, h, m, 0).unwrap()
    }

    #[test]
    fn close_computes_fractional_hours() {
        let mut s = TimeSession::open(1, at(9, 0));
        s.close(at(10, 30)).unwrap();
        assert_eq!(s.hours_worked, 1.5);
        assert!(!s.is_open());
    }

    #[test]
    fn close_before_clock_in_leaves_session_untouched() {
        let mut s = TimeSession::open(1, at(9, 0));
        let err = s.close(at(9, 0)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInterval { .. }));
        assert!(s.is_open());
        assert_eq!(s.hours_worked, 0.0);
    }

    #[test]
    fn correcting_clock_in_rederives_hours() {
        let mut s = TimeSession::open(1, at(9, 0));
        s.close(at(17, 0)).unwrap();
        s.correct(Some(at(8, 15)), None).unwrap();
        assert_eq!(s.hours_worked, 8.75);

        s.correct(None, Some(at(12, 15))).unwrap();
        assert_eq!(s.hours_worked, 4.0);
    }

    #[test]
    fn correcting_into_inverted_interval_fails() {
        let mut s = TimeSession::open(1, at(9, 0));
        s.close(at(10, 0)).unwrap();
        assert!(s.correct(Some(at(11, 0)), None).is_err());
        assert_eq!(s.clock_in, at(9, 0));
        assert_eq!(s.hours_worked, 1.0);
    }

    #[test]
    fn status_reflects_open_session() {
        let s = TimeSession::open(3, at(8, 0));
        let st = ClockStatus::from_open_session(Some(&s));
        assert!(st.is_clocked_in);
        assert_eq!(st.clock_in_time, Some(at(8, 0)));
        assert!(!ClockStatus::from_open_session(None).is_clocked_in);
    }
}
