//! Storage for reservations and venue configuration.
//!
//! The traits describe the external stores the engine reads snapshots from.
//! The in-memory backends implement them for embedded use and tests.

mod memory;
mod traits;

pub use memory::{InMemoryReservationStore, InMemoryVenueConfigStore};
pub use traits::{ReservationStore, StorageError, VenueConfigStore};
