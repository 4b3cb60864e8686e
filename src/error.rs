//! Error types for vrvenue.
//!
//! All errors are strongly typed using thiserror. Availability and pricing
//! functions are total and never produce these; only request validation,
//! configuration loading and the store-backed booking desk do.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::service::Service;
use crate::storage::StorageError;

/// Validation errors surfaced to the booking form as user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Contact field '{field}' cannot be empty")]
    EmptyContact {
        field: String,
    },

    #[error("Party of {people} is not allowed for {service}")]
    InvalidPartySize {
        service: Service,
        people: u8,
    },

    #[error("Duration of {minutes} minutes is not offered for {service}")]
    InvalidDuration {
        service: Service,
        minutes: u32,
    },

    #[error("Capacity '{field}' = {value} exceeds maximum of {max}")]
    CapacityOutOfRange {
        field: String,
        value: u8,
        max: u8,
    },

    #[error("Unknown timezone '{name}'")]
    InvalidTimezone {
        name: String,
    },

    #[error("Invalid setting: {reason}")]
    InvalidSetting {
        reason: String,
    },
}

/// Top-level error type for the booking desk.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Other reservations already fill the requested slot.
    #[error("Slot starting at {start} is not available")]
    SlotUnavailable {
        start: DateTime<Utc>,
    },

    /// The requested slot cannot be booked by anyone: it is in the past,
    /// outside opening hours, or needs a rig the venue does not have.
    #[error("Slot starting at {start} is closed for booking")]
    SlotClosed {
        start: DateTime<Utc>,
    },

    /// A store changed between evaluation and commit on every attempt.
    #[error("Store changed during commit (expected revision {expected}, found {actual})")]
    Conflict {
        expected: u64,
        actual: u64,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },
}

impl BookingError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the booking lost a race against another client.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. }
                | Self::SlotUnavailable { .. }
                | Self::Storage(StorageError::RevisionMismatch { .. })
        )
    }

    /// Returns true if re-fetching and retrying may succeed.
    ///
    /// Backend errors are not: the in-memory stores report a poisoned lock
    /// that way, and it never recovers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::SlotUnavailable { .. }
            | Self::SlotClosed { .. }
            | Self::Config { .. } => false,
            Self::Conflict { .. } => true,
            Self::Storage(e) => matches!(e, StorageError::RevisionMismatch { .. }),
        }
    }
}

/// Result type alias for booking desk operations.
pub type BookingResult<T> = Result<T, BookingError>;
