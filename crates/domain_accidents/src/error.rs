//! Accidents domain errors

use thiserror::Error;
use core_kernel::PortError;
use crate::draft::DraftIssue;

/// Errors raised by the accident record aggregate
#[derive(Debug, Error)]
pub enum AccidentError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Negative amount not allowed: {0}")]
    NegativeAmount(String),

    #[error("Currency mismatch: record is kept in {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    #[error("Refund not found: {0}")]
    RefundNotFound(String),
}

/// Errors raised by the intake workflow
///
/// `Validation` carries the full list of field-scoped issues so the UI
/// can mark every offending field at once; `Port` wraps backend failures,
/// transient or not, which leave the workflow where it was for a
/// user-initiated retry.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{operation} is not valid in the {step} step")]
    WrongStep {
        step: &'static str,
        operation: &'static str,
    },

    #[error("accident draft is not ready for submission")]
    Validation(Vec<DraftIssue>),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl IntakeError {
    /// Returns true when retrying the same action may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, IntakeError::Port(e) if e.is_transient())
    }

    /// The field-scoped issues of a validation failure
    pub fn issues(&self) -> &[DraftIssue] {
        match self {
            IntakeError::Validation(issues) => issues,
            _ => &[],
        }
    }
}
