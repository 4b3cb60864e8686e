//! Price resolution.
//!
//! Prices are informational and layered on top of availability; nothing
//! here feeds back into slot evaluation.
//!
//! Stations are priced per person for the booked duration, with a higher
//! rate Friday through Sunday. Simulator rides follow a per-session tier
//! (first ride full price, second discounted, further rides free) that does
//! not depend on the weekday.

use chrono::Weekday;

use crate::service::Service;

/// Whole currency units.
pub type Price = u32;

/// Per-person station rates by duration: (minutes, weekday, weekend).
const STATION_RATES: [(u32, Price, Price); 4] =
    [(30, 25, 30), (60, 45, 55), (90, 65, 75), (120, 80, 95)];

/// Simulator ride tiers within one session; rides past the table are free.
static SIMULATOR_TIERS: [Price; 2] = [40, 30];

/// Friday, Saturday and Sunday use the weekend rate.
#[must_use]
pub const fn is_weekend_rate(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Price of one booking.
///
/// For simulator services this is the first-ride price; see
/// [`simulator_ride_price`] for later rides of the same session. Durations a
/// service does not offer price at zero.
#[must_use]
pub fn price_for(service: Service, weekday: Weekday, duration_minutes: u32, people: u8) -> Price {
    match service {
        Service::Station => {
            let weekend = is_weekend_rate(weekday);
            STATION_RATES
                .iter()
                .find(|(minutes, _, _)| *minutes == duration_minutes)
                .map_or(0, |&(_, weekday_rate, weekend_rate)| {
                    let rate = if weekend { weekend_rate } else { weekday_rate };
                    rate * Price::from(people)
                })
        }
        Service::SimulatorSolo | Service::SimulatorDuo => {
            if service.accepts_duration(duration_minutes) {
                simulator_ride_price(1)
            } else {
                0
            }
        }
    }
}

/// Price of the `ride`-th simulator ride (1-based) in a session.
#[must_use]
pub fn simulator_ride_price(ride: usize) -> Price {
    ride.checked_sub(1)
        .and_then(|i| SIMULATOR_TIERS.get(i))
        .copied()
        .unwrap_or(0)
}

/// Total for `rides` consecutive simulator rides in one session.
#[must_use]
pub fn simulator_session_total(rides: usize) -> Price {
    (1..=rides).map(simulator_ride_price).sum()
}
