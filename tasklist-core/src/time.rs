//! Time utilities: local wall-clock "now" and day boundaries.
//!
//! Due instants are naive local datetimes (the date and time a user typed),
//! so "now" has to be expressed in the same wall clock before comparing.

use anyhow::Result;
use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::TaskError;

/// Current wall-clock time in the IANA zone `tz`, or the system zone when `None`.
pub fn local_now(tz: Option<&str>) -> Result<NaiveDateTime> {
    match tz {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid timezone: {name}"))?;
            Ok(Utc::now().with_timezone(&tz).naive_local())
        }
        None => Ok(Local::now().naive_local()),
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| TaskError::InvalidDate(s.to_string()))
}

/// Parse an `HH:MM` clock time. `HH:MM:SS` (with optional fraction) is accepted too.
pub fn parse_time(s: &str) -> std::result::Result<NaiveTime, TaskError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S%.f"))
        .map_err(|_| TaskError::InvalidTime(s.to_string()))
}

/// Midnight boundaries around a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start_of_today: NaiveDateTime,
    pub start_of_tomorrow: NaiveDateTime,
    pub start_of_day_after_tomorrow: NaiveDateTime,
}

impl DayBounds {
    pub fn around(now: NaiveDateTime) -> Self {
        let today = now.date();
        // Saturating at NaiveDate::MAX keeps the window empty instead of panicking.
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        let day_after = today.checked_add_days(Days::new(2)).unwrap_or(NaiveDate::MAX);
        Self {
            start_of_today: today.and_time(NaiveTime::MIN),
            start_of_tomorrow: tomorrow.and_time(NaiveTime::MIN),
            start_of_day_after_tomorrow: day_after.and_time(NaiveTime::MIN),
        }
    }
}
