//! The restaurant's wall clock.
//!
//! Opening hours, "today" on the dashboard and kitchen board, and the per-day buckets of
//! sales analytics all read the host's local time zone. Timestamps are stored in UTC and
//! converted at these edges only.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Local wall-clock time, as opening hours are written.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Local midnight at the start of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day_in(now, &Local)
}

pub fn start_of_day_in<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    local_date_in(now, tz)
        .and_hms_opt(0, 0, 0)
        // A midnight skipped by a DST change has no earliest instant; fall back to `now`.
        .and_then(|midnight| midnight.and_local_timezone(tz.clone()).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Calendar date of `at` in `tz`.
pub fn local_date_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}
