//! Blacklist entries and the screening service

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use core_kernel::{AgencyId, BlacklistEntryId, PortError};

use crate::agency::Agency;
use crate::error::PartyError;
use crate::ports::{AgencyDirectory, BlacklistService};

/// A bad-renter report filed by an agency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub id: BlacklistEntryId,
    /// Agency that filed the report
    pub agency_id: AgencyId,
    pub full_name: String,
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub license_number: Option<String>,
    pub reason: String,
    pub listed_at: DateTime<Utc>,
}

impl BlacklistEntry {
    /// Whether any document in the query matches this entry
    pub fn matches(&self, query: &IdentityQuery) -> bool {
        fn hit(entry: &Option<String>, queried: &Option<String>) -> bool {
            match (entry, queried) {
                (Some(e), Some(q)) => e == q,
                _ => false,
            }
        }

        hit(&self.national_id, &query.national_id)
            || hit(&self.passport_id, &query.passport_id)
            || hit(&self.license_number, &query.license_number)
    }
}

/// Identity documents to search the blacklist by
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityQuery {
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub license_number: Option<String>,
}

impl IdentityQuery {
    /// Query by national identity card number
    pub fn by_national_id(id: impl Into<String>) -> Self {
        Self {
            national_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query by passport number
    pub fn by_passport_id(id: impl Into<String>) -> Self {
        Self {
            passport_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query by driving licence number
    pub fn by_license_number(id: impl Into<String>) -> Self {
        Self {
            license_number: Some(id.into()),
            ..Self::default()
        }
    }

    /// True when no document is set
    pub fn is_empty(&self) -> bool {
        self.national_id.is_none() && self.passport_id.is_none() && self.license_number.is_none()
    }
}

/// Outcome of a blacklist screening
#[derive(Debug, Clone)]
pub struct ScreeningReport {
    /// Matching entries, in backend return order
    pub entries: Vec<BlacklistEntry>,
    /// Contact cards of every agency that filed a matching entry
    pub agencies: HashMap<AgencyId, Agency>,
}

impl ScreeningReport {
    /// True when the customer is not blacklisted anywhere
    pub fn is_clear(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cross-checks identity documents against the shared blacklist
///
/// Runs the search, then resolves the contact card of every listing
/// agency so the UI can offer a call right away.
#[derive(Clone)]
pub struct BlacklistScreening {
    blacklist: Arc<dyn BlacklistService>,
    agencies: Arc<dyn AgencyDirectory>,
}

impl BlacklistScreening {
    pub fn new(blacklist: Arc<dyn BlacklistService>, agencies: Arc<dyn AgencyDirectory>) -> Self {
        Self { blacklist, agencies }
    }

    /// Screens the documents and gathers listing-agency contacts
    ///
    /// The agency lookups are issued as one concurrent batch: all fired,
    /// then all awaited. Any single lookup failing fails the screening;
    /// the user retries the whole check.
    pub async fn screen(&self, query: IdentityQuery) -> Result<ScreeningReport, PartyError> {
        if query.is_empty() {
            return Err(PartyError::EmptyIdentityQuery);
        }

        let entries = self.blacklist.search(query).await.map_err(|e| {
            warn!(error = %e, "blacklist search failed");
            e
        })?;

        let mut distinct: Vec<AgencyId> = Vec::new();
        for entry in &entries {
            if !distinct.contains(&entry.agency_id) {
                distinct.push(entry.agency_id);
            }
        }

        let mut lookups = JoinSet::new();
        for agency_id in distinct {
            let directory = self.agencies.clone();
            lookups.spawn(async move { (agency_id, directory.get_agency(agency_id).await) });
        }

        let mut agencies = HashMap::new();
        while let Some(joined) = lookups.join_next().await {
            let (agency_id, result) = joined
                .map_err(|e| PortError::internal(format!("agency lookup task failed: {e}")))?;
            let agency = result.map_err(|e| {
                warn!(agency = %agency_id, error = %e, "agency lookup failed");
                e
            })?;
            agencies.insert(agency_id, agency);
        }

        info!(hits = entries.len(), "blacklist screening finished");
        Ok(ScreeningReport { entries, agencies })
    }
}
