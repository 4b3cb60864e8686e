//! Booking desk: the store-facing side of the engine.
//!
//! The desk reads a snapshot (reservations, their revision and the venue
//! configuration), evaluates it with the pure functions in
//! [`crate::availability`] and commits through
//! [`ReservationStore::create_if_revision`] (or `update_if_revision` for admin
//! edits). If another client wrote in between, or the venue configuration was
//! replaced, the desk re-reads and re-evaluates; a slot that is still free is
//! retried, a slot that is gone is reported as `SlotUnavailable`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::availability::{day_slots, is_available, is_offered, AvailabilityQuery};
use crate::calendar::{local_date, local_weekday};
use crate::config::EngineSettings;
use crate::error::{BookingError, BookingResult, ValidationError};
use crate::operations::BookingRequest;
use crate::pricing::{price_for, Price};
use crate::reservation::{Reservation, ReservationId, ReservationPatch};
use crate::service::Service;
use crate::slot::Slot;
use crate::storage::{ReservationStore, StorageError, VenueConfigStore};
use crate::time::Clock;
use crate::venue::VenueConfig;

/// How many times a commit is attempted before giving up on a revision race.
pub const COMMIT_ATTEMPTS: usize = 3;

/// Reservations and venue configuration as read at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub reservations: Vec<Reservation>,
    pub revision: u64,
    pub venue: VenueConfig,
    pub venue_revision: u64,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Should the caller re-poll before evaluating again?
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, settings: &EngineSettings) -> bool {
        settings.reservations_stale(self.fetched_at, now)
            || settings.venue_stale(self.fetched_at, now)
    }
}

/// Coordinates evaluation and commits against the external stores.
pub struct BookingDesk {
    reservations: Arc<dyn ReservationStore>,
    venue: Arc<dyn VenueConfigStore>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
    // Shared by commits, exclusive for venue updates.
    commit_gate: RwLock<()>,
}

impl BookingDesk {
    /// Creates a desk over the given stores.
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        venue: Arc<dyn VenueConfigStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            reservations,
            venue,
            clock,
            settings,
            commit_gate: RwLock::new(()),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Reads reservations, the venue configuration and their revisions.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn snapshot(&self) -> BookingResult<Snapshot> {
        let (reservations, revision) = self.reservations.snapshot()?;
        let (venue, venue_revision) = self.venue.snapshot()?;
        Ok(Snapshot {
            reservations,
            revision,
            venue,
            venue_revision,
            fetched_at: self.clock.now(),
        })
    }

    /// A query for `service` on the venue-local `date`.
    #[must_use]
    pub fn query(&self, service: Service, date: NaiveDate) -> AvailabilityQuery {
        AvailabilityQuery::new(service, date, self.settings.timezone)
    }

    /// Evaluated slots for `query` against a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn slots_for(&self, query: &AvailabilityQuery) -> BookingResult<Vec<Slot>> {
        let snapshot = self.snapshot()?;
        Ok(day_slots(
            query,
            &snapshot.reservations,
            &snapshot.venue,
            self.clock.now(),
        ))
    }

    fn query_for(&self, request: &BookingRequest) -> AvailabilityQuery {
        let date = local_date(request.start, self.settings.timezone);
        self.query(request.service, date)
            .duration(request.duration_minutes)
            .people(request.people)
    }

    fn check_slot(
        &self,
        start: DateTime<Utc>,
        query: &AvailabilityQuery,
        snapshot: &Snapshot,
    ) -> BookingResult<()> {
        let now = self.clock.now();
        if !is_offered(start, query, &snapshot.venue, now) {
            return Err(BookingError::SlotClosed { start });
        }
        if !is_available(start, query, &snapshot.reservations, &snapshot.venue, now) {
            return Err(BookingError::SlotUnavailable { start });
        }
        Ok(())
    }

    fn commit_gate(&self) -> RwLockReadGuard<'_, ()> {
        // The gate guards no data; a panicked holder leaves nothing to repair.
        self.commit_gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Some((expected, actual))` if the venue configuration was replaced
    /// after `snapshot` was taken.
    fn venue_moved(&self, snapshot: &Snapshot) -> BookingResult<Option<(u64, u64)>> {
        let actual = self.venue.revision()?;
        Ok((actual != snapshot.venue_revision).then_some((snapshot.venue_revision, actual)))
    }

    /// Runs `commit` against fresh snapshots until it lands or the attempts
    /// run out. `evaluate` rejects a snapshot the write must not go through on.
    fn commit_with_retry<T>(
        &self,
        evaluate: impl Fn(&Snapshot) -> BookingResult<()>,
        commit: impl Fn(u64) -> Result<T, StorageError>,
    ) -> BookingResult<T> {
        let mut last = (0, 0);

        for attempt in 1..=COMMIT_ATTEMPTS {
            let snapshot = self.snapshot()?;
            evaluate(&snapshot)?;

            let _gate = self.commit_gate();
            if let Some((expected, actual)) = self.venue_moved(&snapshot)? {
                warn!(attempt, expected, actual, "venue configuration changed during commit; re-evaluating");
                last = (expected, actual);
                continue;
            }

            match commit(snapshot.revision) {
                Ok(stored) => return Ok(stored),
                Err(StorageError::RevisionMismatch { expected, actual }) => {
                    warn!(attempt, expected, actual, "reservation list moved during commit; re-evaluating");
                    last = (expected, actual);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(BookingError::Conflict {
            expected: last.0,
            actual: last.1,
        })
    }

    /// Books `request` if its slot is still available.
    ///
    /// # Errors
    ///
    /// - `SlotClosed` if the slot is in the past, outside opening hours or
    ///   needs a rig the venue lacks
    /// - `SlotUnavailable` if other reservations fill the slot
    /// - `Conflict` if concurrent writers kept winning the commit race
    /// - `Storage` for store failures
    pub fn book(&self, request: BookingRequest) -> BookingResult<Reservation> {
        let query = self.query_for(&request);

        let stored = self.commit_with_retry(
            |snapshot| self.check_slot(request.start, &query, snapshot),
            |revision| {
                self.reservations
                    .create_if_revision(request.clone().into_new_reservation(), revision)
            },
        )?;
        info!(
            id = %stored.id,
            service = %stored.service,
            start = %stored.start,
            people = stored.people,
            "reservation booked"
        );
        Ok(stored)
    }

    /// Admin edit of an existing reservation.
    ///
    /// Changes that move the booking are re-evaluated with the reservation
    /// itself excluded from the conflict check, and committed against the
    /// revision they were evaluated at. Other changes are applied directly.
    ///
    /// # Errors
    ///
    /// - `Storage(ReservationNotFound)` if `id` is unknown
    /// - `Validation` if the edited duration or party size is not offered
    /// - `SlotClosed` / `SlotUnavailable` if the edited slot cannot be taken
    /// - `Conflict` if concurrent writers kept winning the commit race
    pub fn reschedule(&self, id: ReservationId, patch: ReservationPatch) -> BookingResult<Reservation> {
        if !patch.moves_slot() {
            let updated = self.reservations.update(id, patch)?;
            info!(id = %updated.id, "reservation updated");
            return Ok(updated);
        }

        let updated = self.commit_with_retry(
            |snapshot| self.check_edit(id, &patch, snapshot),
            |revision| self.reservations.update_if_revision(id, patch.clone(), revision),
        )?;
        info!(id = %updated.id, start = %updated.start, "reservation updated");
        Ok(updated)
    }

    fn check_edit(
        &self,
        id: ReservationId,
        patch: &ReservationPatch,
        snapshot: &Snapshot,
    ) -> BookingResult<()> {
        let mut proposed = snapshot
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StorageError::ReservationNotFound(id))?;
        proposed.apply(patch.clone());
        if !proposed.is_active() {
            return Ok(());
        }

        if !proposed.service.accepts_duration(proposed.duration_minutes) {
            return Err(ValidationError::InvalidDuration {
                service: proposed.service,
                minutes: proposed.duration_minutes,
            }
            .into());
        }
        if !proposed.service.accepts_party(proposed.people) {
            return Err(ValidationError::InvalidPartySize {
                service: proposed.service,
                people: proposed.people,
            }
            .into());
        }

        let query = self
            .query(proposed.service, local_date(proposed.start, self.settings.timezone))
            .duration(proposed.duration_minutes)
            .people(proposed.people)
            .excluding(id);
        self.check_slot(proposed.start, &query, snapshot)
    }

    /// Flags a reservation as cancelled; it stops occupying capacity.
    ///
    /// # Errors
    ///
    /// `Storage(ReservationNotFound)` if `id` is unknown.
    pub fn cancel(&self, id: ReservationId) -> BookingResult<Reservation> {
        let cancelled = self.reservations.update(id, ReservationPatch::cancel())?;
        info!(id = %id, "reservation cancelled");
        Ok(cancelled)
    }

    /// Deletes a reservation outright.
    ///
    /// # Errors
    ///
    /// `Storage(ReservationNotFound)` if `id` is unknown.
    pub fn remove(&self, id: ReservationId) -> BookingResult<()> {
        self.reservations.delete(id)?;
        info!(id = %id, "reservation removed");
        Ok(())
    }

    /// Replaces the venue configuration.
    ///
    /// # Errors
    ///
    /// `Validation` if a counter is out of range.
    pub fn update_venue(&self, config: VenueConfig) -> BookingResult<VenueConfig> {
        config.validate()?;
        let stored = {
            let _gate = self
                .commit_gate
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            self.venue.update(config)?
        };
        info!(stations = stored.stations, seats = stored.seats, "venue configuration updated");
        Ok(stored)
    }

    /// Price of `request` at the venue-local weekday of its start.
    #[must_use]
    pub fn quote(&self, request: &BookingRequest) -> Price {
        price_for(
            request.service,
            local_weekday(request.start, self.settings.timezone),
            request.duration_minutes,
            request.people,
        )
    }
}

impl std::fmt::Debug for BookingDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingDesk")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
