//! Reservations as handed to the engine by the reservation store.
//!
//! The engine never owns reservation storage. It reads snapshots and derives
//! occupancy from `service`, `start`, `duration_minutes`, `people` and
//! `cancelled`; contact details travel along for the booking form only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::Service;
use crate::time::TimeRange;

/// Store-assigned reservation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random reservation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a reservation ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ReservationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Who booked. Owned by the booking form; the engine ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Contact {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A reservation without an identity, as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub contact: Contact,
    pub service: Service,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub people: u8,
}

impl NewReservation {
    /// Attaches a store-assigned identity.
    #[must_use]
    pub fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            contact: self.contact,
            service: self.service,
            start: self.start,
            duration_minutes: self.duration_minutes,
            people: self.people,
            cancelled: false,
        }
    }
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub contact: Contact,
    pub service: Service,
    /// Start instant; venue-local day and weekday are derived from it.
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub people: u8,
    /// Cancelled reservations never occupy capacity.
    #[serde(default)]
    pub cancelled: bool,
}

impl Reservation {
    /// Occupied interval `[start, start + duration)` on whole minutes.
    #[must_use]
    pub fn interval(&self) -> TimeRange {
        TimeRange::starting_at(self.start, self.duration_minutes)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.cancelled
    }

    /// Applies an admin edit. The id never changes.
    pub fn apply(&mut self, patch: ReservationPatch) {
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        if let Some(service) = patch.service {
            self.service = service;
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(people) = patch.people {
            self.people = people;
        }
        if let Some(cancelled) = patch.cancelled {
            self.cancelled = cancelled;
        }
    }
}

/// Partial update for an admin edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
}

impl ReservationPatch {
    /// A patch that only flags the reservation as cancelled.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            cancelled: Some(true),
            ..Self::default()
        }
    }

    /// Does this patch touch anything that affects occupancy?
    #[must_use]
    pub const fn moves_slot(&self) -> bool {
        self.service.is_some()
            || self.start.is_some()
            || self.duration_minutes.is_some()
            || self.people.is_some()
            || matches!(self.cancelled, Some(false))
    }
}
