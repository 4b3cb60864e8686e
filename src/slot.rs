//! Candidate slots and the slot generator.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{bounds_for, localize};
use crate::service::Service;
use crate::time::TimeRange;

/// A candidate start time and the interval it would occupy.
///
/// Slots are recomputed for every request and carry no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `false` until the slot has been evaluated.
    pub available: bool,
}

impl Slot {
    /// An unevaluated slot of `minutes` length.
    #[must_use]
    pub fn candidate(start: DateTime<Utc>, minutes: u32) -> Self {
        let range = TimeRange::starting_at(start, minutes);
        Self {
            start: range.from,
            end: range.to,
            available: false,
        }
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange {
            from: self.start,
            to: self.end,
        }
    }
}

/// Venue-local start times from `open` to `close` inclusive, one step apart.
#[must_use]
pub fn start_times(date: NaiveDate, service: Service) -> Vec<NaiveTime> {
    let bounds = bounds_for(date, service);
    let step = Duration::minutes(i64::from(bounds.step_minutes.max(1)));

    let mut times = Vec::new();
    let mut t = bounds.open;
    while t <= bounds.close {
        times.push(t);
        let (next, wrapped) = t.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        t = next;
    }
    times
}

/// Generates the ordered, unevaluated candidate slots for `service` on the
/// venue-local `date`.
///
/// Each slot spans the service's shortest duration; [`crate::availability::evaluate`]
/// resizes them to the requested duration. Local times that do not exist
/// (DST gap) are skipped.
#[must_use]
pub fn generate_slots(date: NaiveDate, service: Service, tz: Tz) -> Vec<Slot> {
    start_times(date, service)
        .into_iter()
        .filter_map(|t| localize(date, t, tz))
        .map(|start| Slot::candidate(start, service.default_duration()))
        .collect()
}
