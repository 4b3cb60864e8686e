//! Availability evaluation.
//!
//! One engine serves the booking form, the admin "add" form and the admin
//! "edit" form; the edit flow passes the id of the reservation being edited so
//! it does not conflict with itself.
//!
//! A candidate is available when, in order:
//! 1. it starts strictly after `now`;
//! 2. the requested duration and party size are offered for the service;
//! 3. it lies on the requested venue-local day, inside the operating window,
//!    and the venue has the rig its service needs;
//! 4. the capacity policy of its pool admits it against the other active
//!    reservations of that day.
//!
//! Every function here is pure over its arguments. Evaluating one slot never
//! influences another, so slots may be evaluated in any order.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{bounds_for, local_date, local_time};
use crate::capacity::CapacityPolicy;
use crate::reservation::{Reservation, ReservationId};
use crate::service::Service;
use crate::slot::{generate_slots, Slot};
use crate::time::{truncate_to_minute, TimeRange};
use crate::venue::VenueConfig;

/// What is being asked for.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use vrvenue::{AvailabilityQuery, Service};
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let query = AvailabilityQuery::new(Service::Station, day, chrono_tz::Europe::Warsaw)
///     .duration(60)
///     .people(4);
/// assert_eq!(query.people, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub service: Service,
    /// Venue-local day the slots belong to.
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub people: u8,
    /// Reservation being edited; it never conflicts with itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<ReservationId>,
    /// Venue timezone used for day and weekday.
    pub tz: Tz,
}

impl AvailabilityQuery {
    /// A query with the service's shortest duration and smallest party.
    #[must_use]
    pub fn new(service: Service, date: NaiveDate, tz: Tz) -> Self {
        Self {
            service,
            date,
            duration_minutes: service.default_duration(),
            people: service.fixed_party().unwrap_or(1),
            exclude: None,
            tz,
        }
    }

    #[must_use]
    pub const fn duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    #[must_use]
    pub const fn people(mut self, people: u8) -> Self {
        self.people = people;
        self
    }

    /// Excludes the reservation being edited from conflict checks.
    #[must_use]
    pub const fn excluding(mut self, id: ReservationId) -> Self {
        self.exclude = Some(id);
        self
    }

    fn is_well_formed(&self) -> bool {
        self.service.accepts_duration(self.duration_minutes)
            && self.service.accepts_party(self.people)
    }

    /// Does `start` fall on the queried day, inside the operating window?
    fn in_window(&self, start: DateTime<Utc>) -> bool {
        local_date(start, self.tz) == self.date
            && bounds_for(self.date, self.service).admits(local_time(start, self.tz))
    }

    /// Active reservations on the queried day, minus the one being edited.
    fn competitors<'a>(
        &'a self,
        reservations: &'a [Reservation],
    ) -> impl Iterator<Item = &'a Reservation> + 'a {
        reservations.iter().filter(move |r| {
            r.is_active()
                && Some(r.id) != self.exclude
                && local_date(r.start, self.tz) == self.date
        })
    }
}

/// Could `candidate_start` be booked at all, ignoring other reservations?
///
/// False for past starts, shapes the service does not offer, starts outside
/// the operating window and simulator services the venue has no rig for. A
/// slot that is offered but not [available](is_available) is taken.
#[must_use]
pub fn is_offered(
    candidate_start: DateTime<Utc>,
    query: &AvailabilityQuery,
    config: &VenueConfig,
    now: DateTime<Utc>,
) -> bool {
    let start = truncate_to_minute(candidate_start);
    start > now
        && query.is_well_formed()
        && query.in_window(start)
        && config.supports(query.service)
}

/// Is a booking starting at `candidate_start` legal and conflict-free?
#[must_use]
pub fn is_available(
    candidate_start: DateTime<Utc>,
    query: &AvailabilityQuery,
    reservations: &[Reservation],
    config: &VenueConfig,
    now: DateTime<Utc>,
) -> bool {
    if !is_offered(candidate_start, query, config, now) {
        return false;
    }

    let start = truncate_to_minute(candidate_start);
    let candidate = TimeRange::starting_at(start, query.duration_minutes);
    CapacityPolicy::for_service(query.service, config).admits(
        &candidate,
        query.people,
        query.competitors(reservations),
    )
}

/// Annotates each slot with its availability for `query`.
///
/// Slot ends are recomputed from the query's duration.
#[must_use]
pub fn evaluate(
    slots: &[Slot],
    query: &AvailabilityQuery,
    reservations: &[Reservation],
    config: &VenueConfig,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let day: Vec<Reservation> = query.competitors(reservations).cloned().collect();

    let evaluated: Vec<Slot> = slots
        .iter()
        .map(|slot| {
            let mut out = Slot::candidate(slot.start, query.duration_minutes);
            out.available = is_available(slot.start, query, &day, config, now);
            out
        })
        .collect();

    debug!(
        service = %query.service,
        date = %query.date,
        candidates = evaluated.len(),
        available = evaluated.iter().filter(|s| s.available).count(),
        "evaluated slots"
    );
    evaluated
}

/// Generates and evaluates every slot of the queried day.
#[must_use]
pub fn day_slots(
    query: &AvailabilityQuery,
    reservations: &[Reservation],
    config: &VenueConfig,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let candidates = generate_slots(query.date, query.service, query.tz);
    evaluate(&candidates, query, reservations, config, now)
}
