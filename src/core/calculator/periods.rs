//! Period boundaries (today / this week / this month) in an explicit timezone.
//!
//! Weeks run Monday 00:00:00 to Sunday 23:59:59, months from the 1st 00:00:00
//! to the last day 23:59:59. Nothing here reads the host clock or locale.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta, Utc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
}

/// Inclusive `[start, end]` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl PeriodBounds {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

/// Calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

pub fn week_start_date(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

pub fn month_start_date(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn month_end_date(date: NaiveDate) -> NaiveDate {
    month_start_date(date)
        .checked_add_months(Months::new(1))
        .map(|next| next - Days::new(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Midnight at the start of `date` in `tz`.
pub fn local_midnight(date: NaiveDate, tz: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - TimeDelta::seconds(i64::from(tz.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, tz)
}

/// 23:59:59 at the end of `date` in `tz`.
pub fn local_end_of_day(date: NaiveDate, tz: FixedOffset) -> DateTime<FixedOffset> {
    local_midnight(date, tz) + TimeDelta::days(1) - TimeDelta::seconds(1)
}

/// First calendar day of `period` containing `date`.
pub fn period_start_date(period: Period, date: NaiveDate) -> NaiveDate {
    match period {
        Period::Today => date,
        Period::Week => week_start_date(date),
        Period::Month => month_start_date(date),
    }
}

/// Start of `period` containing `now`, in `tz`.
pub fn start_of_period(period: Period, now: DateTime<Utc>, tz: FixedOffset) -> DateTime<FixedOffset> {
    local_midnight(period_start_date(period, local_date(now, tz)), tz)
}

/// `[start_of_period(now), now]`.
pub fn elapsed_window(period: Period, now: DateTime<Utc>, tz: FixedOffset) -> PeriodBounds {
    PeriodBounds {
        start: start_of_period(period, now, tz),
        end: now.with_timezone(&tz),
    }
}

/// Full Monday-Sunday week containing `date`.
pub fn week_bounds(date: NaiveDate, tz: FixedOffset) -> PeriodBounds {
    let monday = week_start_date(date);
    let sunday = monday + Days::new(6);
    PeriodBounds {
        start: local_midnight(monday, tz),
        end: local_end_of_day(sunday, tz),
    }
}

/// Full calendar month containing `date`.
pub fn month_bounds(date: NaiveDate, tz: FixedOffset) -> PeriodBounds {
    PeriodBounds {
        start: local_midnight(month_start_date(date), tz),
        end: local_end_of_day(month_end_date(date), tz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-04-10 is a Thursday
        assert_eq!(week_start_date(d(2025, 4, 10)), d(2025, 4, 7));
        assert_eq!(week_start_date(d(2025, 4, 7)), d(2025, 4, 7));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(week_start_date(d(2025, 4, 13)), d(2025, 4, 7));
        assert_eq!(week_start_date(d(2025, 4, 7)).weekday(), Weekday::Mon);
    }

    #[test]
    fn week_bounds_are_monday_to_sunday_inclusive() {
        let b = week_bounds(d(2025, 4, 10), utc());
        assert_eq!(b.first_day(), d(2025, 4, 7));
        assert_eq!(b.last_day(), d(2025, 4, 13));
        assert_eq!((b.end.hour(), b.end.minute(), b.end.second()), (23, 59, 59));
    }

    #[test]
    fn month_bounds_cover_leap_february() {
        let b = month_bounds(d(2024, 2, 14), utc());
        assert_eq!(b.first_day(), d(2024, 2, 1));
        assert_eq!(b.last_day(), d(2024, 2, 29));
        assert_eq!(month_end_date(d(2025, 12, 31)), d(2025, 12, 31));
    }

    #[test]
    fn offset_moves_the_local_day() {
        // 23:30 UTC on Sunday is already Monday in +01:00
        let now = Utc.with_ymd_and_hms(2025, 4, 13, 23, 30, 0).unwrap();
        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(local_date(now, utc()), d(2025, 4, 13));
        assert_eq!(local_date(now, cet), d(2025, 4, 14));

        let week_utc = start_of_period(Period::Week, now, utc());
        let week_cet = start_of_period(Period::Week, now, cet);
        assert_eq!(week_utc.date_naive(), d(2025, 4, 7));
        assert_eq!(week_cet.date_naive(), d(2025, 4, 14));
        assert_eq!(week_cet.with_timezone(&Utc), Utc.with_ymd_and_hms(2025, 4, 13, 23, 0, 0).unwrap());
    }

    #[test]
    fn elapsed_window_ends_at_now() {
        let now = Utc.with_ymd_and_hms(2025, 4, 16, 15, 45, 0).unwrap();
        let w = elapsed_window(Period::Month, now, utc());
        assert_eq!(w.first_day(), d(2025, 4, 1));
        assert!(w.contains(now));
        assert!(!w.contains(now + TimeDelta::seconds(1)));
        assert!(w.contains(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()));
    }
}
