//! In-progress accident declaration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AgencyId, CarId, Currency, ReservationId};
use crate::ports::NewAccident;

/// A field-scoped validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftIssue {
    /// The draft field the issue is about
    pub field: &'static str,
    pub message: String,
}

impl DraftIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Client-held accident data, not yet persisted
///
/// Created empty when the intake workflow starts, filled in field by
/// field as the user moves through the steps, and discarded on abandon
/// or after a successful submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccidentDraft {
    pub accident_date: Option<DateTime<Utc>>,
    pub car_id: Option<CarId>,
    /// Set only when an ongoing reservation was found and linked
    pub reservation_id: Option<ReservationId>,
    pub notes: String,
    pub expert_full_name: Option<String>,
    pub expert_phone: Option<String>,
}

impl AccidentDraft {
    /// Creates an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the draft for submission
    ///
    /// Returns every issue at once so the UI can mark all offending
    /// fields; an empty list means the draft is submittable.
    pub fn validate(&self, now: DateTime<Utc>) -> Vec<DraftIssue> {
        let mut issues = Vec::new();

        match self.accident_date {
            None => issues.push(DraftIssue::new("accident_date", "accident date is required")),
            Some(date) if date > now => {
                issues.push(DraftIssue::new(
                    "accident_date",
                    "accident date must not be in the future",
                ));
            }
            Some(_) => {}
        }

        if self.car_id.is_none() {
            issues.push(DraftIssue::new("car_id", "a car must be selected"));
        }

        if self.notes.trim().is_empty() {
            issues.push(DraftIssue::new("notes", "notes must not be empty"));
        }

        issues
    }

    /// Validates and converts the draft into a create payload
    ///
    /// Returns the full issue list when the draft is not submittable.
    pub fn submission_payload(
        &self,
        agency_id: AgencyId,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Result<NewAccident, Vec<DraftIssue>> {
        let issues = self.validate(now);
        match (self.accident_date, self.car_id) {
            (Some(accident_date), Some(car_id)) if issues.is_empty() => Ok(NewAccident {
                agency_id,
                car_id,
                reservation_id: self.reservation_id,
                accident_date,
                notes: self.notes.trim().to_string(),
                expert_full_name: self.expert_full_name.clone(),
                expert_phone: self.expert_phone.clone(),
                currency,
            }),
            _ => Err(issues),
        }
    }
}
