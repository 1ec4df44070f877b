//! Opening hours: the stored day rows and the weekly schedule derived from them.

use crate::hours::HoursError;
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One row of the hours table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantHour {
    /// 0 = Sunday … 6 = Saturday.
    pub day_of_week: u8,
    pub is_open: bool,
    #[serde(default, with = "wall_clock")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "wall_clock")]
    pub close_time: Option<NaiveTime>,
}

impl RestaurantHour {
    pub fn open(day_of_week: u8, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            day_of_week,
            is_open: true,
            open_time: Some(open),
            close_time: Some(close),
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            is_open: false,
            open_time: None,
            close_time: None,
        }
    }
}

/// Accepts `HH:MM:SS` or `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, HoursError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| HoursError::InvalidTime(value.to_string()))
}

/// `21:30` -> `9:30 PM`.
pub fn format_12h(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
}

/// `HH:MM:SS` on the wire, `null` or empty for closed days.
mod wall_clock {
    use super::parse_time;
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => s.serialize_str(&time.format("%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.filter(|value| !value.trim().is_empty())
            .map(|value| parse_time(&value).map_err(de::Error::custom))
            .transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayHours {
    /// Closing before opening means the window runs past midnight. Equal times open the
    /// day for that one minute only.
    pub fn wraps_midnight(&self) -> bool {
        self.close < self.open
    }
}

/// Open windows per weekday, Sunday first. Closed days are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
    days: [Option<DayHours>; 7],
}

impl Default for WeeklySchedule {
    /// Built-in hours used while the table is empty or unreachable.
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        let day = |open, close| Some(DayHours { open, close });
        Self {
            days: [
                day(hm(12, 0), hm(23, 0)),
                day(hm(12, 0), hm(23, 59)),
                day(hm(0, 0), hm(23, 59)),
                day(hm(0, 0), hm(23, 59)),
                day(hm(0, 0), hm(23, 0)),
                day(hm(0, 0), hm(2, 0)),
                day(hm(0, 0), hm(2, 0)),
            ],
        }
    }
}

impl WeeklySchedule {
    /// Rows marked closed, out of range or missing a time leave their day closed.
    /// An empty table yields the default hours.
    pub fn from_rows(rows: &[RestaurantHour]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let mut days = [None; 7];
        for row in rows {
            let (true, Some(open), Some(close)) = (row.is_open, row.open_time, row.close_time)
            else {
                continue;
            };
            if let Some(slot) = days.get_mut(usize::from(row.day_of_week)) {
                *slot = Some(DayHours {
                    open: truncate(open),
                    close: truncate(close),
                });
            }
        }
        Self { days }
    }

    pub fn day(&self, day_of_week: usize) -> Option<DayHours> {
        self.days.get(day_of_week).copied().flatten()
    }

    pub fn today(&self, at: NaiveDateTime) -> Option<DayHours> {
        self.day(day_index(at))
    }

    /// Minute precision, both ends inclusive. A window that wraps midnight also covers
    /// the early hours of the next day.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        let now = truncate(at.time());
        let today = day_index(at);

        let open_today = self.day(today).is_some_and(|hours| {
            if hours.wraps_midnight() {
                now >= hours.open
            } else {
                hours.open <= now && now <= hours.close
            }
        });
        let spill_from_yesterday = self
            .day((today + 6) % 7)
            .is_some_and(|hours| hours.wraps_midnight() && now <= hours.close);

        open_today || spill_from_yesterday
    }

    /// `"<Weekday> at HH:MM"` for the first open day after today within a week, else `"Soon"`.
    pub fn next_opening(&self, at: NaiveDateTime) -> String {
        let today = day_index(at);
        (1..=7)
            .map(|offset| (today + offset) % 7)
            .find_map(|day| {
                self.day(day)
                    .map(|hours| format!("{} at {}", DAY_NAMES[day], hours.open.format("%H:%M")))
            })
            .unwrap_or_else(|| "Soon".to_string())
    }
}

fn day_index(at: NaiveDateTime) -> usize {
    at.weekday().num_days_from_sunday() as usize
}

fn truncate(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
