//! Party Domain
//!
//! This crate manages the people and organizations around the fleet:
//! customers with their identity documents, agencies, and the shared
//! blacklist agencies report bad renters to.
//!
//! # Blacklist Screening
//!
//! Customer creation, editing, and identity-document extraction all run
//! the same cross-check: search the blacklist by whichever documents are
//! known, then fetch the contact card of every agency that listed a hit
//! so staff can call them. The agency lookups are the one concurrent
//! batch in the platform — all fired at once, all awaited, and a single
//! failure fails the whole screening.

pub mod customer;
pub mod agency;
pub mod blacklist;
pub mod error;
pub mod ports;

pub use customer::Customer;
pub use agency::Agency;
pub use blacklist::{BlacklistEntry, BlacklistScreening, IdentityQuery, ScreeningReport};
pub use error::PartyError;
pub use ports::{AgencyDirectory, BlacklistService};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryAgencyDirectory, InMemoryBlacklist};
