//! Fleet domain errors

use thiserror::Error;
use core_kernel::TemporalError;

/// Errors that can occur in the fleet domain
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Odometer regression: return reading {end} is below pickup reading {start}")]
    OdometerRegression { start: u32, end: u32 },

    #[error("Cannot reassign the car of a {status} reservation")]
    CarReassignmentNotAllowed { status: String },

    #[error("Car not found: {0}")]
    CarNotFound(String),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}
