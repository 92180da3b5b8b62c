//! Agency contact card

use serde::{Deserialize, Serialize};

use core_kernel::{AgencyId, Currency, Timezone};

/// A rental agency on the platform
///
/// Shown as a contact card when a blacklist hit was reported by another
/// agency and staff need to reach them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Local timezone, used for day boundaries on its screens
    pub timezone: Timezone,
    /// Currency its charges and accident costs are kept in
    pub currency: Currency,
}

impl Agency {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        timezone: Timezone,
        currency: Currency,
    ) -> Self {
        Self {
            id: AgencyId::new_v7(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            timezone,
            currency,
        }
    }
}
