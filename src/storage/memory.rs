//! In-memory storage backend.
//!
//! Thread-safe implementations of the storage traits, for embedded use,
//! tests and as a reference for real backends. A single write lock covers
//! both the check and the write of `create_if_revision` and
//! `update_if_revision`, which is what makes the commit atomic.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::reservation::{NewReservation, Reservation, ReservationId, ReservationPatch};
use crate::storage::traits::{ReservationStore, StorageError, VenueConfigStore};
use crate::venue::VenueConfig;

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct ReservationState {
    by_id: HashMap<ReservationId, Reservation>,
    revision: u64,
}

impl ReservationState {
    fn insert(&mut self, reservation: NewReservation) -> Reservation {
        let mut id = ReservationId::new();
        while self.by_id.contains_key(&id) {
            id = ReservationId::new();
        }
        let stored = reservation.into_reservation(id);
        self.by_id.insert(id, stored.clone());
        self.revision += 1;
        stored
    }

    fn patch(&mut self, id: ReservationId, patch: ReservationPatch) -> Result<Reservation, StorageError> {
        let entry = self
            .by_id
            .get_mut(&id)
            .ok_or(StorageError::ReservationNotFound(id))?;
        entry.apply(patch);
        let updated = entry.clone();
        self.revision += 1;
        Ok(updated)
    }

    fn sorted(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self.by_id.values().cloned().collect();
        all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid())));
        all
    }
}

/// Thread-safe in-memory reservation store.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    state: RwLock<ReservationState>,
}

impl InMemoryReservationStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn list(&self) -> Result<Vec<Reservation>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("reservation.list"))?;
        Ok(state.sorted())
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("reservation.get"))?;
        Ok(state.by_id.get(&id).cloned())
    }

    fn create(&self, reservation: NewReservation) -> Result<Reservation, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("reservation.create"))?;
        let stored = state.insert(reservation);
        debug!(id = %stored.id, revision = state.revision, "reservation created");
        Ok(stored)
    }

    fn create_if_revision(
        &self,
        reservation: NewReservation,
        expected_revision: u64,
    ) -> Result<Reservation, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("reservation.create_if_revision"))?;
        if state.revision != expected_revision {
            return Err(StorageError::RevisionMismatch {
                expected: expected_revision,
                actual: state.revision,
            });
        }
        let stored = state.insert(reservation);
        debug!(id = %stored.id, revision = state.revision, "reservation committed");
        Ok(stored)
    }

    fn update(&self, id: ReservationId, patch: ReservationPatch) -> Result<Reservation, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("reservation.update"))?;
        state.patch(id, patch)
    }

    fn update_if_revision(
        &self,
        id: ReservationId,
        patch: ReservationPatch,
        expected_revision: u64,
    ) -> Result<Reservation, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("reservation.update_if_revision"))?;
        if state.revision != expected_revision {
            return Err(StorageError::RevisionMismatch {
                expected: expected_revision,
                actual: state.revision,
            });
        }
        let updated = state.patch(id, patch)?;
        debug!(id = %updated.id, revision = state.revision, "reservation update committed");
        Ok(updated)
    }

    fn delete(&self, id: ReservationId) -> Result<(), StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("reservation.delete"))?;
        state
            .by_id
            .remove(&id)
            .ok_or(StorageError::ReservationNotFound(id))?;
        state.revision += 1;
        Ok(())
    }

    fn revision(&self) -> Result<u64, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("reservation.revision"))?;
        Ok(state.revision)
    }

    fn snapshot(&self) -> Result<(Vec<Reservation>, u64), StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("reservation.snapshot"))?;
        Ok((state.sorted(), state.revision))
    }
}

#[derive(Debug, Default)]
struct VenueState {
    config: VenueConfig,
    revision: u64,
}

/// Thread-safe in-memory venue configuration.
#[derive(Debug, Default)]
pub struct InMemoryVenueConfigStore {
    state: RwLock<VenueState>,
}

impl InMemoryVenueConfigStore {
    /// Create a store holding `config`.
    #[must_use]
    pub fn new(config: VenueConfig) -> Self {
        Self {
            state: RwLock::new(VenueState {
                config,
                revision: 0,
            }),
        }
    }
}

impl VenueConfigStore for InMemoryVenueConfigStore {
    fn get(&self) -> Result<VenueConfig, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("venue.get"))?;
        Ok(state.config)
    }

    fn update(&self, config: VenueConfig) -> Result<VenueConfig, StorageError> {
        config
            .validate()
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        let mut state = self.state.write().map_err(|_| lock_err("venue.update"))?;
        state.config = config;
        state.revision += 1;
        debug!(revision = state.revision, "venue configuration replaced");
        Ok(config)
    }

    fn revision(&self) -> Result<u64, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("venue.revision"))?;
        Ok(state.revision)
    }

    fn snapshot(&self) -> Result<(VenueConfig, u64), StorageError> {
        let state = self.state.read().map_err(|_| lock_err("venue.snapshot"))?;
        Ok((state.config, state.revision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::Contact;
    use crate::service::Service;
    use chrono::{Duration, TimeZone, Utc};

    fn new_booking(minutes_from_nine: i64) -> NewReservation {
        NewReservation {
            contact: Contact::new("Guest", "000"),
            service: Service::Station,
            start: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
                + Duration::minutes(minutes_from_nine),
            duration_minutes: 30,
            people: 2,
        }
    }

    #[test]
    fn test_create_assigns_id_and_bumps_revision() {
        let store = InMemoryReservationStore::new();
        assert_eq!(store.revision().unwrap(), 0);

        let created = store.create(new_booking(0)).unwrap();
        assert_eq!(store.revision().unwrap(), 1);
        assert_eq!(store.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_list_is_sorted_by_start() {
        let store = InMemoryReservationStore::new();
        store.create(new_booking(60)).unwrap();
        store.create(new_booking(0)).unwrap();
        store.create(new_booking(30)).unwrap();

        let starts: Vec<_> = store.list().unwrap().iter().map(|r| r.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_create_if_revision_rejects_stale() {
        let store = InMemoryReservationStore::new();
        let (_, rev) = store.snapshot().unwrap();
        store.create(new_booking(0)).unwrap();

        let err = store.create_if_revision(new_booking(30), rev).unwrap_err();
        assert_eq!(
            err,
            StorageError::RevisionMismatch {
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_if_revision_accepts_current() {
        let store = InMemoryReservationStore::new();
        let rev = store.revision().unwrap();
        assert!(store.create_if_revision(new_booking(0), rev).is_ok());
    }

    #[test]
    fn test_update_and_delete() {
        let store = InMemoryReservationStore::new();
        let created = store.create(new_booking(0)).unwrap();

        let updated = store.update(created.id, ReservationPatch::cancel()).unwrap();
        assert!(updated.cancelled);
        assert_eq!(store.revision().unwrap(), 2);

        store.delete(created.id).unwrap();
        assert!(store.get(created.id).unwrap().is_none());
        assert!(matches!(
            store.delete(created.id),
            Err(StorageError::ReservationNotFound(_))
        ));
    }

    #[test]
    fn test_update_if_revision_rejects_stale() {
        let store = InMemoryReservationStore::new();
        let mine = store.create(new_booking(0)).unwrap();
        let (_, rev) = store.snapshot().unwrap();
        store.create(new_booking(30)).unwrap();

        let moved = ReservationPatch {
            start: Some(Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap()),
            ..ReservationPatch::default()
        };
        let err = store.update_if_revision(mine.id, moved.clone(), rev).unwrap_err();
        assert_eq!(
            err,
            StorageError::RevisionMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(store.get(mine.id).unwrap(), Some(mine.clone()));

        let current = store.revision().unwrap();
        let updated = store.update_if_revision(mine.id, moved, current).unwrap();
        assert_eq!(updated.start, Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap());
        assert_eq!(store.revision().unwrap(), current + 1);
    }

    #[test]
    fn test_update_if_revision_missing() {
        let store = InMemoryReservationStore::new();
        let rev = store.revision().unwrap();
        let result = store.update_if_revision(ReservationId::new(), ReservationPatch::cancel(), rev);
        assert!(matches!(result, Err(StorageError::ReservationNotFound(_))));
        assert_eq!(store.revision().unwrap(), rev);
    }

    #[test]
    fn test_update_missing() {
        let store = InMemoryReservationStore::new();
        let result = store.update(ReservationId::new(), ReservationPatch::cancel());
        assert!(matches!(result, Err(StorageError::ReservationNotFound(_))));
    }

    #[test]
    fn test_venue_config_store() {
        let store = InMemoryVenueConfigStore::new(VenueConfig::full());
        let reduced = VenueConfig::new(4, 1).unwrap();
        assert_eq!(store.revision().unwrap(), 0);
        assert_eq!(store.update(reduced).unwrap(), reduced);
        assert_eq!(store.get().unwrap(), reduced);
        assert_eq!(store.snapshot().unwrap(), (reduced, 1));
    }

    #[test]
    fn test_venue_config_store_rejects_out_of_range() {
        let store = InMemoryVenueConfigStore::new(VenueConfig::full());
        let bad = VenueConfig { stations: 12, seats: 1 };
        assert!(store.update(bad).is_err());
        assert_eq!(store.get().unwrap(), VenueConfig::full());
        assert_eq!(store.revision().unwrap(), 0);
    }
}
