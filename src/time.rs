//! Temporal primitives: half-open intervals and clock injection.
//!
//! Every comparison in the engine happens on whole minutes. Timestamps coming
//! back from a store may carry serialization noise (seconds, nanoseconds), so
//! they are truncated before any overlap test.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Drops seconds and sub-second precision from a timestamp.
#[must_use]
pub fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Do `[a_start, a_end)` and `[b_start, b_end)` intersect?
///
/// Back-to-back intervals (`a_end == b_start`) do not overlap.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use vrvenue::time::overlaps;
///
/// let t = Utc::now();
/// let m30 = Duration::minutes(30);
/// assert!(!overlaps(t, t + m30, t + m30, t + m30 + m30));
/// ```
#[must_use]
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    let (a_start, a_end) = (truncate_to_minute(a_start), truncate_to_minute(a_end));
    let (b_start, b_end) = (truncate_to_minute(b_start), truncate_to_minute(b_end));
    a_start < b_end && b_start < a_end
}

/// A half-open interval `[from, to)` on whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive).
    pub from: DateTime<Utc>,

    /// End of the range (exclusive).
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Creates the range `[start, start + minutes)`.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Self {
        let from = truncate_to_minute(start);
        Self {
            from,
            to: from + Duration::minutes(i64::from(minutes)),
        }
    }

    /// Check if a timestamp falls within this range [from, to).
    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        let time = truncate_to_minute(time);
        time >= self.from && time < self.to
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self.from, self.to, other.from, other.to)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} → {})", self.from, self.to)
    }
}

/// Source of "now" for evaluation.
///
/// Evaluators take `now` as a plain argument; the clock only lives at the
/// booking desk, which reads it once per request.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant, for tests and replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_overlaps_partial() {
        assert!(overlaps(at(9, 0), at(9, 30), at(9, 15), at(9, 45)));
        assert!(overlaps(at(9, 15), at(9, 45), at(9, 0), at(9, 30)));
    }

    #[test]
    fn test_back_to_back_does_not_overlap() {
        assert!(!overlaps(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
        assert!(!overlaps(at(10, 30), at(11, 0), at(10, 0), at(10, 30)));
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(overlaps(at(9, 0), at(11, 0), at(9, 30), at(10, 0)));
    }

    #[test]
    fn test_sub_minute_drift_is_ignored() {
        let end = at(10, 30) + Duration::seconds(42) + Duration::milliseconds(7);
        assert!(!overlaps(at(10, 0), end, at(10, 30), at(11, 0)));
    }

    #[test]
    fn test_truncate_to_minute() {
        let noisy = at(14, 5) + Duration::seconds(59) + Duration::nanoseconds(12);
        assert_eq!(truncate_to_minute(noisy), at(14, 5));
    }

    #[test]
    fn test_time_range_contains() {
        let range = TimeRange::starting_at(at(12, 0), 30);
        assert!(range.contains(at(12, 0)));
        assert!(range.contains(at(12, 29)));
        assert!(!range.contains(at(12, 30)));
        assert_eq!(range.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_time_range_overlaps() {
        let a = TimeRange::starting_at(at(12, 0), 60);
        let b = TimeRange::starting_at(at(12, 45), 15);
        let c = TimeRange::starting_at(at(13, 0), 15);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(at(8, 0));
        assert_eq!(clock.now(), at(8, 0));
    }

    #[test]
    fn test_time_range_display() {
        let display = format!("{}", TimeRange::starting_at(at(9, 0), 15));
        assert!(display.contains("→"));
    }
}
