//! Venue capacity configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::service::{Service, MAX_STATION_PARTY};

/// Largest shared-room headcount the venue can be configured for.
pub const MAX_STATIONS: u8 = MAX_STATION_PARTY;

/// Seats on the simulator rig.
pub const MAX_SEATS: u8 = 2;

/// Capacity counters read from the venue-configuration store.
///
/// Zero is a valid setting for either counter and means "nothing bookable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Headcount ceiling of the shared station room (0-8).
    pub stations: u8,
    /// Installed simulator seats (0-2).
    pub seats: u8,
}

impl VenueConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CapacityOutOfRange` if a counter exceeds its maximum.
    pub fn new(stations: u8, seats: u8) -> Result<Self, ValidationError> {
        let config = Self { stations, seats };
        config.validate()?;
        Ok(config)
    }

    /// Everything installed.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            stations: MAX_STATIONS,
            seats: MAX_SEATS,
        }
    }

    /// Checks both counters against their ranges.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CapacityOutOfRange` for the first counter out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stations > MAX_STATIONS {
            return Err(ValidationError::CapacityOutOfRange {
                field: "stations".to_string(),
                value: self.stations,
                max: MAX_STATIONS,
            });
        }
        if self.seats > MAX_SEATS {
            return Err(ValidationError::CapacityOutOfRange {
                field: "seats".to_string(),
                value: self.seats,
                max: MAX_SEATS,
            });
        }
        Ok(())
    }

    /// Is the simulator rig fitted for this service at all?
    #[must_use]
    pub const fn supports(&self, service: Service) -> bool {
        self.seats >= service.seats_required()
    }
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self::full()
    }
}
