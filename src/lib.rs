//! # vrvenue - slot availability for a VR venue
//!
//! The venue has two bookable resource pools:
//!
//! - **Stations**: a shared room with a headcount ceiling. Overlapping
//!   parties add up until the room is full.
//! - **Simulator**: one rig with one or two seats. Only one party rides at a
//!   time, whatever its size.
//!
//! Given a service, a venue-local day, a duration and a party size, the
//! engine decides which start times can be offered. It never owns storage:
//! it evaluates reservation and venue-configuration snapshots handed to it,
//! and takes `now` as an argument.
//!
//! ## Core Concepts
//!
//! - **Operating calendar**: opening window and slot step per service and weekday
//! - **Slot**: a candidate start time, evaluated independently of all others
//! - **Capacity policy**: additive headcount (stations) or exclusive occupancy (simulator)
//! - **Booking desk**: snapshot, evaluate, revision-checked commit
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use vrvenue::{day_slots, AvailabilityQuery, Service, VenueConfig};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let query = AvailabilityQuery::new(Service::Station, day, chrono_tz::Europe::Warsaw)
//!     .duration(60)
//!     .people(4);
//! let now = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
//!
//! let slots = day_slots(&query, &[], &VenueConfig::full(), now);
//! assert!(slots.iter().all(|s| s.available));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Engine: pure evaluation over snapshots
pub mod availability;
pub mod calendar;
pub mod capacity;
pub mod pricing;
pub mod service;
pub mod slot;
pub mod time;

// Data model
pub mod error;
pub mod reservation;
pub mod venue;

// Stores, settings and the booking boundary
pub mod booking;
pub mod config;
pub mod operations;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use availability::{day_slots, evaluate, is_available, is_offered, AvailabilityQuery};
pub use calendar::{bounds_for, OperatingBounds};
pub use capacity::CapacityPolicy;
pub use pricing::{price_for, simulator_ride_price, simulator_session_total, Price};
pub use reservation::{Contact, NewReservation, Reservation, ReservationId, ReservationPatch};
pub use service::{ResourcePool, Service};
pub use slot::{generate_slots, Slot};
pub use time::{overlaps, Clock, FixedClock, SystemClock, TimeRange};
pub use venue::VenueConfig;

pub use booking::{BookingDesk, Snapshot};
pub use config::EngineSettings;
pub use error::{BookingError, BookingResult, ValidationError};
pub use operations::{BookingRequest, BookingRequestBuilder};
pub use storage::{
    InMemoryReservationStore, InMemoryVenueConfigStore, ReservationStore, StorageError,
    VenueConfigStore,
};
