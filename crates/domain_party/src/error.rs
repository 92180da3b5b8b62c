//! Party domain errors

use thiserror::Error;
use core_kernel::PortError;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    #[error("at least one identity document is required to screen a customer")]
    EmptyIdentityQuery,

    #[error("Invalid customer data: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl PartyError {
    /// Returns true when retrying the same action may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PartyError::Port(e) if e.is_transient())
    }
}
