//! Party Domain Ports

use async_trait::async_trait;

use core_kernel::{AgencyId, DomainPort, PortError};

use crate::agency::Agency;
use crate::blacklist::{BlacklistEntry, IdentityQuery};

/// Search access to the shared blacklist
#[async_trait]
pub trait BlacklistService: DomainPort {
    /// Entries matching any of the queried documents
    async fn search(&self, query: IdentityQuery) -> Result<Vec<BlacklistEntry>, PortError>;
}

/// Lookup of agency contact cards
#[async_trait]
pub trait AgencyDirectory: DomainPort {
    async fn get_agency(&self, id: AgencyId) -> Result<Agency, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory blacklist
    #[derive(Debug, Default)]
    pub struct InMemoryBlacklist {
        entries: Arc<RwLock<Vec<BlacklistEntry>>>,
    }

    impl InMemoryBlacklist {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn insert(&self, entry: BlacklistEntry) {
            self.entries.write().await.push(entry);
        }
    }

    impl DomainPort for InMemoryBlacklist {}

    #[async_trait]
    impl BlacklistService for InMemoryBlacklist {
        async fn search(&self, query: IdentityQuery) -> Result<Vec<BlacklistEntry>, PortError> {
            Ok(self
                .entries
                .read()
                .await
                .iter()
                .filter(|e| e.matches(&query))
                .cloned()
                .collect())
        }
    }

    /// In-memory agency directory with injectable failures
    #[derive(Debug, Default)]
    pub struct InMemoryAgencyDirectory {
        agencies: Arc<RwLock<Vec<Agency>>>,
        failing: Arc<RwLock<HashSet<AgencyId>>>,
        lookups: Arc<RwLock<Vec<AgencyId>>>,
    }

    impl InMemoryAgencyDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn insert(&self, agency: Agency) {
            self.agencies.write().await.push(agency);
        }

        /// Makes every lookup of this agency fail as unavailable
        pub async fn fail_agency(&self, id: AgencyId) {
            self.failing.write().await.insert(id);
        }

        /// Lookups received so far, in arrival order
        pub async fn lookups(&self) -> Vec<AgencyId> {
            self.lookups.read().await.clone()
        }
    }

    impl DomainPort for InMemoryAgencyDirectory {}

    #[async_trait]
    impl AgencyDirectory for InMemoryAgencyDirectory {
        async fn get_agency(&self, id: AgencyId) -> Result<Agency, PortError> {
            self.lookups.write().await.push(id);

            if self.failing.read().await.contains(&id) {
                return Err(PortError::ServiceUnavailable {
                    service: "agencies".to_string(),
                });
            }

            self.agencies
                .read()
                .await
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Agency", id))
        }
    }
}
