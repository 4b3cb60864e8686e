//! Operating calendar: opening windows and slot steps per service and weekday.
//!
//! | Service | Mon–Sat | Sunday | Step |
//! |---------|---------|--------|------|
//! | Station | 09:00–20:30 | 10:00–19:30 | 30 min |
//! | Simulator (either variant) | 09:00–20:45 | 10:00–19:45 | 15 min |
//!
//! The closing time is the last bookable *start*, not the moment the venue
//! shuts. There is no holiday calendar.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::service::Service;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Opening window for one service on one venue-local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingBounds {
    /// First bookable start.
    pub open: NaiveTime,
    /// Last bookable start (inclusive).
    pub close: NaiveTime,
    /// Distance between consecutive slot starts.
    pub step_minutes: u32,
}

impl OperatingBounds {
    /// Is `time` a start inside `[open, close]`?
    #[must_use]
    pub fn admits(&self, time: NaiveTime) -> bool {
        time >= self.open && time <= self.close
    }
}

/// Returns the opening window for `service` on the venue-local `date`.
#[must_use]
pub fn bounds_for(date: NaiveDate, service: Service) -> OperatingBounds {
    let sunday = date.weekday() == Weekday::Sun;
    match (service.is_simulator(), sunday) {
        (false, false) => OperatingBounds {
            open: hm(9, 0),
            close: hm(20, 30),
            step_minutes: 30,
        },
        (false, true) => OperatingBounds {
            open: hm(10, 0),
            close: hm(19, 30),
            step_minutes: 30,
        },
        (true, false) => OperatingBounds {
            open: hm(9, 0),
            close: hm(20, 45),
            step_minutes: 15,
        },
        (true, true) => OperatingBounds {
            open: hm(10, 0),
            close: hm(19, 45),
            step_minutes: 15,
        },
    }
}

/// Venue-local calendar date of an instant.
#[must_use]
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Venue-local wall-clock time of an instant.
#[must_use]
pub fn local_time(at: DateTime<Utc>, tz: Tz) -> NaiveTime {
    at.with_timezone(&tz).time()
}

/// Venue-local weekday of an instant.
#[must_use]
pub fn local_weekday(at: DateTime<Utc>, tz: Tz) -> Weekday {
    at.with_timezone(&tz).weekday()
}

/// Resolves a venue-local wall-clock time to an instant.
///
/// Returns `None` for local times skipped by a DST transition. Ambiguous
/// times (clocks turned back) resolve to the earlier instant.
#[must_use]
pub fn localize(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(t) => Some(t.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
