//! Bookable services and the resource pools they draw from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest party a shared station booking may carry.
pub const MAX_STATION_PARTY: u8 = 8;

/// Fixed length of a simulator ride, in minutes.
pub const SIMULATOR_RIDE_MINUTES: u32 = 15;

const STATION_DURATIONS: [u32; 4] = [30, 60, 90, 120];
const SIMULATOR_DURATIONS: [u32; 1] = [SIMULATOR_RIDE_MINUTES];

/// Which physical resource a service consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePool {
    /// Headcount-limited room: overlapping parties add up.
    Shared,
    /// Single rig: any overlapping booking blocks.
    Exclusive,
}

/// A bookable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// VR station in the shared room, 1-8 people, 30-120 minutes.
    Station,
    /// Simulator ride for one person.
    SimulatorSolo,
    /// Simulator ride for two people; needs both seats installed.
    SimulatorDuo,
}

impl Service {
    /// All services, in display order.
    pub const ALL: [Self; 3] = [Self::Station, Self::SimulatorSolo, Self::SimulatorDuo];

    #[must_use]
    pub const fn pool(self) -> ResourcePool {
        match self {
            Self::Station => ResourcePool::Shared,
            Self::SimulatorSolo | Self::SimulatorDuo => ResourcePool::Exclusive,
        }
    }

    #[must_use]
    pub const fn is_simulator(self) -> bool {
        matches!(self.pool(), ResourcePool::Exclusive)
    }

    /// Durations (minutes) this service can be booked for.
    #[must_use]
    pub const fn durations(self) -> &'static [u32] {
        match self {
            Self::Station => &STATION_DURATIONS,
            Self::SimulatorSolo | Self::SimulatorDuo => &SIMULATOR_DURATIONS,
        }
    }

    /// Shortest offered duration; used for unevaluated slot ends.
    #[must_use]
    pub const fn default_duration(self) -> u32 {
        match self {
            Self::Station => STATION_DURATIONS[0],
            Self::SimulatorSolo | Self::SimulatorDuo => SIMULATOR_RIDE_MINUTES,
        }
    }

    #[must_use]
    pub fn accepts_duration(self, minutes: u32) -> bool {
        self.durations().contains(&minutes)
    }

    /// Simulator variants have a fixed party size.
    #[must_use]
    pub const fn fixed_party(self) -> Option<u8> {
        match self {
            Self::Station => None,
            Self::SimulatorSolo => Some(1),
            Self::SimulatorDuo => Some(2),
        }
    }

    #[must_use]
    pub const fn accepts_party(self, people: u8) -> bool {
        match self.fixed_party() {
            Some(fixed) => people == fixed,
            None => people >= 1 && people <= MAX_STATION_PARTY,
        }
    }

    /// Simulator seats that must be installed for this service to be offered.
    #[must_use]
    pub const fn seats_required(self) -> u8 {
        match self {
            Self::Station => 0,
            Self::SimulatorSolo => 1,
            Self::SimulatorDuo => 2,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Station => write!(f, "station"),
            Self::SimulatorSolo => write!(f, "simulator (1 seat)"),
            Self::SimulatorDuo => write!(f, "simulator (2 seats)"),
        }
    }
}
