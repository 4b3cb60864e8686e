//! Request builders.
//!
//! These builders provide a fluent, type-safe API for constructing booking
//! requests. They validate form input before anything reaches a store.

mod request;

pub use request::{BookingRequest, BookingRequestBuilder};
