//! Booking request builder.
//!
//! The builder turns raw booking-form input into a [`BookingRequest`]. Every
//! missing or malformed field becomes a `ValidationError` the form can show
//! as-is; nothing here consults availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reservation::{Contact, NewReservation};
use crate::service::Service;

/// A validated booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub contact: Contact,
    pub service: Service,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub people: u8,
}

impl BookingRequest {
    #[must_use]
    pub fn into_new_reservation(self) -> NewReservation {
        NewReservation {
            contact: self.contact,
            service: self.service,
            start: self.start,
            duration_minutes: self.duration_minutes,
            people: self.people,
        }
    }
}

/// Builder for booking requests.
///
/// # Example
/// ```rust,ignore
/// let request = BookingRequestBuilder::new()
///     .name("Ada Lovelace")
///     .phone("+48 600 100 200")
///     .service(Service::Station)
///     .start(start)
///     .duration(60)
///     .people(4)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookingRequestBuilder {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    service: Option<Service>,
    start: Option<DateTime<Utc>>,
    duration_minutes: Option<u32>,
    people: Option<u8>,
}

impl BookingRequestBuilder {
    /// Creates a new builder with no fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requester's name (required).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the requester's phone number (required).
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set an e-mail address (optional).
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the service (required).
    #[must_use]
    pub fn service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the slot start (required).
    #[must_use]
    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the duration in minutes (required for stations).
    #[must_use]
    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set the party size (required for stations).
    #[must_use]
    pub fn people(mut self, people: u8) -> Self {
        self.people = Some(people);
        self
    }

    /// Build the request.
    ///
    /// Simulator services fill in their fixed duration and party size when
    /// those are not given.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingField` if a required field is not set
    /// - `ValidationError::EmptyContact` if name or phone is blank
    /// - `ValidationError::InvalidDuration` / `InvalidPartySize` if the service does not offer them
    pub fn build(self) -> Result<BookingRequest, ValidationError> {
        let name = required_text(self.name, "name")?;
        let phone = required_text(self.phone, "phone")?;

        let service = self.service.ok_or_else(|| ValidationError::MissingField {
            field: "service".to_string(),
        })?;

        let start = self.start.ok_or_else(|| ValidationError::MissingField {
            field: "start".to_string(),
        })?;

        let duration_minutes = match (self.duration_minutes, service.is_simulator()) {
            (Some(minutes), _) => minutes,
            (None, true) => service.default_duration(),
            (None, false) => {
                return Err(ValidationError::MissingField {
                    field: "duration".to_string(),
                })
            }
        };
        if !service.accepts_duration(duration_minutes) {
            return Err(ValidationError::InvalidDuration {
                service,
                minutes: duration_minutes,
            });
        }

        let people = self
            .people
            .or_else(|| service.fixed_party())
            .ok_or_else(|| ValidationError::MissingField {
                field: "people".to_string(),
            })?;
        if !service.accepts_party(people) {
            return Err(ValidationError::InvalidPartySize { service, people });
        }

        let mut contact = Contact::new(name, phone);
        if let Some(email) = self.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
            contact = contact.with_email(email);
        }

        Ok(BookingRequest {
            contact,
            service,
            start,
            duration_minutes,
            people,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::MissingField {
        field: field.to_string(),
    })?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::EmptyContact {
            field: field.to_string(),
        });
    }
    Ok(value)
}
