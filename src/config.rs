//! Engine settings.
//!
//! Loaded from TOML (`vrvenue.toml`) with environment overrides:
//!
//! ```toml
//! timezone = "Europe/Warsaw"
//! reservation_poll_secs = 30
//! venue_poll_secs = 60
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BookingError, BookingResult, ValidationError};

/// Environment variable overriding the venue timezone.
pub const TIMEZONE_ENV: &str = "VRVENUE_TIMEZONE";

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "vrvenue.toml";

/// Settings shared by the booking desk and its callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Venue timezone; decides calendar day and weekday.
    pub timezone: Tz,
    /// How often callers should refresh the reservation list.
    pub reservation_poll_secs: u64,
    /// How often callers should refresh the venue configuration.
    pub venue_poll_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Warsaw,
            reservation_poll_secs: 30,
            venue_poll_secs: 60,
        }
    }
}

impl EngineSettings {
    /// Parse settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the TOML is malformed, or a validation
    /// error if a value is out of range.
    pub fn from_toml(content: &str) -> BookingResult<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| BookingError::config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> BookingResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BookingError::config(format!("cannot read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml(&content)
    }

    /// Load `vrvenue.toml` from the working directory if present, otherwise
    /// defaults; then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file or override is invalid.
    pub fn load() -> BookingResult<Self> {
        let path = PathBuf::from(CONFIG_FILE);
        let settings = if path.exists() {
            info!("Loading settings from: {}", path.display());
            Self::from_file(&path)?
        } else {
            info!("No settings file found, using defaults");
            Self::default()
        };
        settings.with_env_overrides()
    }

    /// Applies `VRVENUE_TIMEZONE` if set.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidTimezone` for an unknown zone name.
    pub fn with_env_overrides(self) -> BookingResult<Self> {
        match std::env::var(TIMEZONE_ENV) {
            Ok(name) => self.with_timezone_name(&name),
            Err(_) => Ok(self),
        }
    }

    /// Sets the timezone from an IANA name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidTimezone` for an unknown zone name.
    pub fn with_timezone_name(mut self, name: &str) -> BookingResult<Self> {
        self.timezone = name
            .trim()
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone {
                name: name.to_string(),
            })?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.reservation_poll_secs == 0 {
            return Err(ValidationError::InvalidSetting {
                reason: "reservation_poll_secs must be > 0".to_string(),
            });
        }
        if self.venue_poll_secs == 0 {
            return Err(ValidationError::InvalidSetting {
                reason: "venue_poll_secs must be > 0".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn reservation_poll_interval(&self) -> Duration {
        Duration::seconds(i64::try_from(self.reservation_poll_secs).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn venue_poll_interval(&self) -> Duration {
        Duration::seconds(i64::try_from(self.venue_poll_secs).unwrap_or(i64::MAX))
    }

    /// Has a reservation list fetched at `fetched_at` outlived its poll interval?
    #[must_use]
    pub fn reservations_stale(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - fetched_at >= self.reservation_poll_interval()
    }

    /// Has a venue configuration fetched at `fetched_at` outlived its poll interval?
    #[must_use]
    pub fn venue_stale(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - fetched_at >= self.venue_poll_interval()
    }
}
