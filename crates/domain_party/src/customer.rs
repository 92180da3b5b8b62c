//! Customer aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{AgencyId, CustomerId};
use crate::blacklist::IdentityQuery;
use crate::error::PartyError;

/// A renting customer
///
/// Identity documents are optional individually but at least one is
/// needed before the customer can be screened against the blacklist.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: CustomerId,
    /// Agency the customer was registered by
    pub agency_id: AgencyId,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub phone: Option<String>,
    /// National identity card number
    pub national_id: Option<String>,
    /// Passport number, for foreign renters
    pub passport_id: Option<String>,
    /// Driving licence number
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Registers a new customer after validating contact details
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        agency_id: AgencyId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        national_id: Option<String>,
        passport_id: Option<String>,
        license_number: Option<String>,
    ) -> Result<Self, PartyError> {
        let customer = Self {
            id: CustomerId::new_v7(),
            agency_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            phone,
            national_id,
            passport_id,
            license_number,
            created_at: Utc::now(),
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Builds the blacklist query from whichever documents are present
    ///
    /// This is also the seam the identity-document extractor feeds into:
    /// extracted fields land on the customer, then screening runs the
    /// same query.
    pub fn identity_query(&self) -> IdentityQuery {
        IdentityQuery {
            national_id: self.national_id.clone(),
            passport_id: self.passport_id.clone(),
            license_number: self.license_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_customer(email: Option<String>) -> Result<Customer, PartyError> {
        Customer::register(
            AgencyId::new(),
            "Leila",
            "Ben Salah",
            email,
            Some("+216 98 123 456".to_string()),
            Some("09876543".to_string()),
            None,
            Some("TN-552431".to_string()),
        )
    }

    #[test]
    fn test_register_valid_customer() {
        let customer = register_customer(Some("leila@example.tn".to_string())).unwrap();
        assert_eq!(customer.full_name(), "Leila Ben Salah");
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let result = register_customer(Some("not-an-email".to_string()));
        assert!(matches!(result, Err(PartyError::Validation(_))));
    }

    #[test]
    fn test_identity_query_carries_known_documents() {
        let customer = register_customer(None).unwrap();
        let query = customer.identity_query();

        assert_eq!(query.national_id.as_deref(), Some("09876543"));
        assert!(query.passport_id.is_none());
        assert_eq!(query.license_number.as_deref(), Some("TN-552431"));
        assert!(!query.is_empty());
    }
}
