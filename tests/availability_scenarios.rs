use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Warsaw;
use proptest::prelude::*;

use vrvenue::{
    day_slots, evaluate, generate_slots, is_available, overlaps, AvailabilityQuery, Contact,
    NewReservation, Reservation, ReservationId, Service, VenueConfig,
};

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Warsaw
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn reservation(service: Service, start: DateTime<Utc>, minutes: u32, people: u8) -> Reservation {
    NewReservation {
        contact: Contact::new("Guest", "000"),
        service,
        start,
        duration_minutes: minutes,
        people,
    }
    .into_reservation(ReservationId::new())
}

// 2025-03-12 is a Wednesday, 2025-03-16 a Sunday.
fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()
}

fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn station_headcount_example() {
    let config = VenueConfig::new(8, 2).unwrap();
    let existing = vec![reservation(Service::Station, local(2025, 3, 12, 9, 0), 30, 5)];

    let four = AvailabilityQuery::new(Service::Station, wednesday(), Warsaw)
        .duration(30)
        .people(4);
    assert!(!is_available(local(2025, 3, 12, 9, 15), &four, &existing, &config, long_ago()));

    let three = four.people(3);
    assert!(is_available(local(2025, 3, 12, 9, 15), &three, &existing, &config, long_ago()));
}

#[test]
fn simulator_solo_blocks_duo() {
    let config = VenueConfig::new(8, 2).unwrap();
    let existing = vec![reservation(Service::SimulatorSolo, local(2025, 3, 12, 14, 0), 15, 1)];
    let duo = AvailabilityQuery::new(Service::SimulatorDuo, wednesday(), Warsaw);
    assert!(!is_available(local(2025, 3, 12, 14, 0), &duo, &existing, &config, long_ago()));
}

#[test]
fn sunday_opening_bound() {
    let query = AvailabilityQuery::new(Service::Station, sunday(), Warsaw);
    let config = VenueConfig::full();
    assert!(!is_available(local(2025, 3, 16, 9, 30), &query, &[], &config, long_ago()));
    assert!(is_available(local(2025, 3, 16, 10, 0), &query, &[], &config, long_ago()));

    let slots = day_slots(&query, &[], &config, long_ago());
    assert_eq!(slots[0].start, local(2025, 3, 16, 10, 0));
}

#[test]
fn back_to_back_is_legal_for_both_pools() {
    let config = VenueConfig::full();
    let existing = vec![
        reservation(Service::Station, local(2025, 3, 12, 10, 0), 30, 8),
        reservation(Service::SimulatorDuo, local(2025, 3, 12, 10, 0), 15, 2),
    ];

    let station = AvailabilityQuery::new(Service::Station, wednesday(), Warsaw)
        .duration(30)
        .people(8);
    assert!(is_available(local(2025, 3, 12, 10, 30), &station, &existing, &config, long_ago()));

    let rig = AvailabilityQuery::new(Service::SimulatorSolo, wednesday(), Warsaw);
    assert!(is_available(local(2025, 3, 12, 10, 15), &rig, &existing, &config, long_ago()));
}

#[test]
fn cancelled_reservations_are_ignored() {
    let mut cancelled = reservation(Service::SimulatorSolo, local(2025, 3, 12, 11, 0), 15, 1);
    cancelled.cancelled = true;
    let query = AvailabilityQuery::new(Service::SimulatorSolo, wednesday(), Warsaw);
    assert!(is_available(
        local(2025, 3, 12, 11, 0),
        &query,
        &[cancelled],
        &VenueConfig::full(),
        long_ago()
    ));
}

#[test]
fn duo_needs_two_seats() {
    let one_seat = VenueConfig::new(8, 1).unwrap();
    let duo = AvailabilityQuery::new(Service::SimulatorDuo, wednesday(), Warsaw);
    assert!(day_slots(&duo, &[], &one_seat, long_ago()).iter().all(|s| !s.available));

    let solo = AvailabilityQuery::new(Service::SimulatorSolo, wednesday(), Warsaw);
    assert!(day_slots(&solo, &[], &one_seat, long_ago()).iter().all(|s| s.available));
}

#[test]
fn serialization_noise_does_not_create_conflicts() {
    // Round-tripped through a store as 09:30:00.400; counts as a 09:30-09:45 ride.
    let noisy = local(2025, 3, 12, 9, 30) + Duration::milliseconds(400);
    let existing = vec![reservation(Service::SimulatorSolo, noisy, 15, 1)];
    let query = AvailabilityQuery::new(Service::SimulatorSolo, wednesday(), Warsaw);
    let config = VenueConfig::full();
    assert!(is_available(local(2025, 3, 12, 9, 15), &query, &existing, &config, long_ago()));
    assert!(!is_available(local(2025, 3, 12, 9, 30), &query, &existing, &config, long_ago()));
}

fn station_booking() -> impl Strategy<Value = (u32, u32, u8)> {
    // (slot index within the weekday window, duration index, people)
    (0u32..24, 0usize..4, 1u8..=8).prop_map(|(slot, d, people)| (slot, [30, 60, 90, 120][d], people))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_overlap_is_symmetric(a in 0i64..2000, la in 1i64..240, b in 0i64..2000, lb in 1i64..240) {
        let base = Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap();
        let (a0, a1) = (base + Duration::minutes(a), base + Duration::minutes(a + la));
        let (b0, b1) = (base + Duration::minutes(b), base + Duration::minutes(b + lb));
        prop_assert_eq!(overlaps(a0, a1, b0, b1), overlaps(b0, b1, a0, a1));
    }

    #[test]
    fn prop_headcount_never_exceeds_stations(
        requests in proptest::collection::vec(station_booking(), 1..40),
        stations in 0u8..=8,
    ) {
        let config = VenueConfig::new(stations, 2).unwrap();
        let opening = local(2025, 3, 12, 9, 0);
        let mut accepted: Vec<Reservation> = Vec::new();

        for (slot, minutes, people) in requests {
            let start = opening + Duration::minutes(i64::from(slot) * 30);
            let query = AvailabilityQuery::new(Service::Station, wednesday(), Warsaw)
                .duration(minutes)
                .people(people);
            if is_available(start, &query, &accepted, &config, long_ago()) {
                accepted.push(reservation(Service::Station, start, minutes, people));
            }
        }

        for minute in 0..(15 * 60) {
            let instant = opening + Duration::minutes(minute);
            let load: u32 = accepted
                .iter()
                .filter(|r| r.interval().contains(instant))
                .map(|r| u32::from(r.people))
                .sum();
            prop_assert!(load <= u32::from(stations));
        }
    }

    #[test]
    fn prop_rig_is_exclusive(requests in proptest::collection::vec((0u32..48, any::<bool>()), 1..60)) {
        let config = VenueConfig::full();
        let opening = local(2025, 3, 12, 9, 0);
        let mut accepted: Vec<Reservation> = Vec::new();

        for (slot, duo) in requests {
            let service = if duo { Service::SimulatorDuo } else { Service::SimulatorSolo };
            let start = opening + Duration::minutes(i64::from(slot) * 15);
            let query = AvailabilityQuery::new(service, wednesday(), Warsaw);
            if is_available(start, &query, &accepted, &config, long_ago()) {
                accepted.push(reservation(service, start, 15, service.fixed_party().unwrap()));
            }
        }

        for minute in 0..(13 * 60) {
            let instant = opening + Duration::minutes(minute);
            let riding = accepted.iter().filter(|r| r.interval().contains(instant)).count();
            prop_assert!(riding <= 1);
        }
    }

    #[test]
    fn prop_past_slots_rejected(offset in 0i64..(14 * 60), lag in 0i64..600) {
        let candidate = local(2025, 3, 12, 9, 0) + Duration::minutes(offset);
        let now = candidate + Duration::minutes(lag);
        let query = AvailabilityQuery::new(Service::SimulatorSolo, wednesday(), Warsaw);
        prop_assert!(!is_available(candidate, &query, &[], &VenueConfig::full(), now));
    }

    #[test]
    fn prop_no_seats_no_rides(day_offset in 0i64..730, duo in any::<bool>()) {
        let date = wednesday() + Duration::days(day_offset);
        let service = if duo { Service::SimulatorDuo } else { Service::SimulatorSolo };
        let query = AvailabilityQuery::new(service, date, Warsaw);
        let slots = day_slots(&query, &[], &VenueConfig::new(8, 0).unwrap(), long_ago());
        prop_assert!(!slots.is_empty());
        prop_assert!(slots.iter().all(|s| !s.available));
    }

    #[test]
    fn prop_evaluate_is_idempotent(requests in proptest::collection::vec(station_booking(), 0..20), people in 1u8..=8) {
        let opening = local(2025, 3, 12, 9, 0);
        let existing: Vec<Reservation> = requests
            .into_iter()
            .map(|(slot, minutes, p)| {
                reservation(Service::Station, opening + Duration::minutes(i64::from(slot) * 30), minutes, p)
            })
            .collect();
        let query = AvailabilityQuery::new(Service::Station, wednesday(), Warsaw).duration(60).people(people);
        let candidates = generate_slots(wednesday(), Service::Station, Warsaw);

        let first = evaluate(&candidates, &query, &existing, &VenueConfig::full(), long_ago());
        let second = evaluate(&candidates, &query, &existing, &VenueConfig::full(), long_ago());
        prop_assert_eq!(&first, &second);

        // Reverse order, same answers.
        let reversed: Vec<_> = candidates.iter().rev().copied().collect();
        let mut backwards = evaluate(&reversed, &query, &existing, &VenueConfig::full(), long_ago());
        backwards.reverse();
        prop_assert_eq!(first, backwards);
    }
}
