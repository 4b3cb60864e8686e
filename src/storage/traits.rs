//! Abstract storage traits for reservations and venue configuration.
//!
//! The engine only reads snapshots. Mutation goes through these traits, and
//! only in response to explicit create/update/delete actions.

use thiserror::Error;

use crate::reservation::{NewReservation, Reservation, ReservationId, ReservationPatch};
use crate::venue::VenueConfig;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Reservation not found.
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// Optimistic commit lost against a concurrent writer.
    #[error("Revision mismatch: expected {expected}, store is at {actual}")]
    RevisionMismatch {
        /// Revision the caller evaluated against.
        expected: u64,
        /// Revision found at commit time.
        actual: u64,
    },

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Storage trait for reservations.
///
/// Every successful mutation advances [`ReservationStore::revision`]. A caller
/// that evaluated availability against revision `n` commits with
/// [`ReservationStore::create_if_revision`] so that two clients cannot both
/// book the last free place.
pub trait ReservationStore: Send + Sync {
    /// All reservations, cancelled ones included.
    fn list(&self) -> Result<Vec<Reservation>, StorageError>;

    /// Get a reservation by ID.
    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StorageError>;

    /// Insert a new reservation; the store assigns its id.
    fn create(&self, reservation: NewReservation) -> Result<Reservation, StorageError>;

    /// Insert only if nothing changed since `expected_revision`.
    ///
    /// # Errors
    /// - `RevisionMismatch`: if the store has moved past `expected_revision`
    fn create_if_revision(
        &self,
        reservation: NewReservation,
        expected_revision: u64,
    ) -> Result<Reservation, StorageError>;

    /// Apply a partial update. Returns error if not found.
    fn update(&self, id: ReservationId, patch: ReservationPatch) -> Result<Reservation, StorageError>;

    /// Apply a partial update only if nothing changed since `expected_revision`.
    ///
    /// # Errors
    /// - `ReservationNotFound`: if `id` is unknown
    /// - `RevisionMismatch`: if the store has moved past `expected_revision`
    fn update_if_revision(
        &self,
        id: ReservationId,
        patch: ReservationPatch,
        expected_revision: u64,
    ) -> Result<Reservation, StorageError>;

    /// Remove a reservation immediately. Returns error if not found.
    fn delete(&self, id: ReservationId) -> Result<(), StorageError>;

    /// Monotonic change counter.
    fn revision(&self) -> Result<u64, StorageError>;

    /// Reservations together with the revision they were read at.
    fn snapshot(&self) -> Result<(Vec<Reservation>, u64), StorageError>;
}

/// Storage trait for the venue configuration.
///
/// Like reservations, the configuration carries a change counter so that a
/// commit evaluated against one configuration can tell it was replaced.
pub trait VenueConfigStore: Send + Sync {
    /// Current configuration.
    fn get(&self) -> Result<VenueConfig, StorageError>;

    /// Replace the configuration, returning what was stored.
    fn update(&self, config: VenueConfig) -> Result<VenueConfig, StorageError>;

    /// Monotonic change counter.
    fn revision(&self) -> Result<u64, StorageError>;

    /// Configuration together with the revision it was read at.
    fn snapshot(&self) -> Result<(VenueConfig, u64), StorageError>;
}
