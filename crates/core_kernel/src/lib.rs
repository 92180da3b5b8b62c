//! Core Kernel - Foundational types and utilities for the rental platform
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Temporal types for rental periods and agency-local dates
//! - Common identifiers and value objects
//! - The shared port error taxonomy for external service adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{RentalPeriod, DateRange, Timezone, TemporalError};
pub use identifiers::{
    AgencyId, CarId, ReservationId, AccidentId, CustomerId,
    ExpenseId, RefundId, BlacklistEntryId,
};
pub use error::CoreError;
pub use ports::{DomainPort, PortError, GatewayAuth, GatewayConfig};
