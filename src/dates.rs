//! Calendar-date helpers.
//!
//! Due dates and payment dates are plain calendar dates inside the engine.
//! They only become timestamps at the store boundary, pinned to a neutral
//! hour in UTC so that no timezone west of UTC+12 or east of UTC-12 shifts
//! them onto a neighbouring day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// hour of day (UTC) attached to calendar dates crossing the store boundary
pub const NEUTRAL_HOUR_UTC: u32 = 12;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// date for `day` in the given month, clamped to the month's last day
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// (year, month) of the month after the given one
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// add calendar months, clamping the day (Jan 31 + 1 month = Feb 28/29)
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let zero_based = date.month0() as i64 + i64::from(months);
    let year = date.year() as i64 + zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;

    clamped_date(i32::try_from(year).ok()?, month, date.day())
}

/// true when both dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// whole calendar days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// timestamp sent to the store for a calendar date
pub fn to_boundary(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(NEUTRAL_HOUR_UTC, 0, 0).unwrap_or_default();
    date.and_time(time).and_utc()
}

/// rfc 3339 rendering of the boundary timestamp, e.g. "2024-03-10T12:00:00.000Z"
pub fn to_boundary_string(date: NaiveDate) -> String {
    to_boundary(date).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// parse a date coming from a form or the store.
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and rfc 3339
/// timestamps. A timestamp keeps the calendar date of its own offset, so
/// `2024-03-10T00:00:00-03:00` is the 10th, not the UTC 9th.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.date_naive());
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// serde support for calendar dates carried as boundary timestamps
pub mod wire {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_boundary_string(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw}")))
    }
}

/// serde support for optional dates where an unparseable value reads as absent
pub mod wire_lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::to_boundary_string(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_calendar_date))
    }
}
