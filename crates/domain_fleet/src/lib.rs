//! Fleet Domain
//!
//! This crate manages the rental fleet: cars, reservations, vehicle
//! returns, and availability lookups.
//!
//! # Reservation Lifecycle
//!
//! ```text
//! Upcoming -> Ongoing -> Completed
//!     \-> Cancelled
//! ```
//!
//! A reservation becomes Ongoing at pickup (odometer captured) and
//! Completed at return, which closes its rental period at the actual
//! return instant. While Ongoing, the reservation blocks accident intake
//! for its car until resolved.

pub mod car;
pub mod reservation;
pub mod error;
pub mod ports;

pub use car::{Car, CarStatus};
pub use reservation::{Reservation, ReservationStatus, ReturnDetails};
pub use error::FleetError;
pub use ports::{CarLookup, ReservationService};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryFleet;
