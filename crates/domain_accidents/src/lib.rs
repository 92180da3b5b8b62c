//! Accidents Domain
//!
//! This crate implements accident intake and tracking for the rental
//! fleet: the three-step declaration workflow, resolution of the ongoing
//! reservation a damaged car may be out on, and the accident record with
//! its expenses, refunds, and derived net cost.
//!
//! # Intake Workflow
//!
//! ```text
//! DateAndCar -> ReservationResolution -> AccidentDetails -> (submitted)
//!        \________________________________/
//!         (no ongoing reservation found)
//! ```
//!
//! The middle step only appears when the selected car has an Ongoing
//! reservation covering the accident date; the user then decides to
//! complete it, leave it untouched, or move it onto a replacement car
//! before describing the accident.

pub mod accident;
pub mod draft;
pub mod conflict;
pub mod workflow;
pub mod error;
pub mod ports;

pub use accident::{AccidentRecord, AccidentStatus, Expense, Refund};
pub use draft::{AccidentDraft, DraftIssue};
pub use conflict::{find_conflict, ConflictCheck};
pub use workflow::{AccidentIntake, IntakeStep, LinkedReservation, ResolutionAction};
pub use error::{AccidentError, IntakeError};
pub use ports::{AccidentService, AccidentUpdate, NewAccident};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryAccidents;
