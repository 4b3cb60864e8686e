//! Capacity evaluation for the two resource pools.
//!
//! - **Shared** (stations): headcounts of overlapping bookings add up and
//!   must stay within `VenueConfig::stations`.
//! - **Exclusive** (simulator): one rig, one party at a time. Any overlapping
//!   simulator booking blocks, whatever its declared party size or variant.
//!
//! Both policies ignore cancelled reservations and reservations of the other
//! pool, so callers may pass an unfiltered day.

use crate::reservation::Reservation;
use crate::service::{ResourcePool, Service};
use crate::time::TimeRange;
use crate::venue::VenueConfig;

/// How contention is counted for a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Additive headcount against a ceiling.
    Headcount {
        /// Maximum simultaneous occupants.
        ceiling: u8,
    },
    /// Binary occupancy of a single mechanism.
    Exclusive {
        /// Whether the requested variant is fitted at all.
        fitted: bool,
    },
}

impl CapacityPolicy {
    /// Selects the policy for `service` under `config`.
    #[must_use]
    pub const fn for_service(service: Service, config: &VenueConfig) -> Self {
        match service.pool() {
            ResourcePool::Shared => Self::Headcount {
                ceiling: config.stations,
            },
            ResourcePool::Exclusive => Self::Exclusive {
                fitted: config.seats > 0 && config.supports(service),
            },
        }
    }

    /// Would a party of `people` fit into `candidate` alongside `reservations`?
    pub fn admits<'a, I>(&self, candidate: &TimeRange, people: u8, reservations: I) -> bool
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        match *self {
            Self::Headcount { ceiling } => {
                let committed = shared_occupancy(candidate, reservations);
                committed + u32::from(people) <= u32::from(ceiling)
            }
            Self::Exclusive { fitted } => fitted && !rig_occupied(candidate, reservations),
        }
    }
}

/// Sum of `people` over active station bookings overlapping `candidate`.
///
/// Overlaps are counted against the candidate as a whole, not per minute:
/// two bookings that each touch the candidate both count even if they never
/// overlap each other.
pub fn shared_occupancy<'a, I>(candidate: &TimeRange, reservations: I) -> u32
where
    I: IntoIterator<Item = &'a Reservation>,
{
    reservations
        .into_iter()
        .filter(|r| r.is_active() && r.service.pool() == ResourcePool::Shared)
        .filter(|r| r.interval().overlaps(candidate))
        .map(|r| u32::from(r.people))
        .sum()
}

/// Does any active simulator booking overlap `candidate`?
pub fn rig_occupied<'a, I>(candidate: &TimeRange, reservations: I) -> bool
where
    I: IntoIterator<Item = &'a Reservation>,
{
    reservations
        .into_iter()
        .filter(|r| r.is_active() && r.service.pool() == ResourcePool::Exclusive)
        .any(|r| r.interval().overlaps(candidate))
}
