//! Tests for the party domain

use std::sync::Arc;

use chrono::Utc;

use core_kernel::{AgencyId, BlacklistEntryId, Currency, Timezone};
use domain_party::{
    Agency, BlacklistEntry, BlacklistScreening, IdentityQuery, InMemoryAgencyDirectory,
    InMemoryBlacklist, PartyError,
};

fn agency(name: &str) -> Agency {
    Agency::new(
        name,
        format!("{}@rental.tn", name.to_lowercase().replace(' ', ".")),
        "+216 71 000 000",
        "Tunis",
        Timezone::default(),
        Currency::TND,
    )
}

fn entry_for(agency_id: AgencyId, national_id: &str) -> BlacklistEntry {
    BlacklistEntry {
        id: BlacklistEntryId::new(),
        agency_id,
        full_name: "Karim Jlassi".to_string(),
        national_id: Some(national_id.to_string()),
        passport_id: None,
        license_number: None,
        reason: "unpaid damages".to_string(),
        listed_at: Utc::now(),
    }
}

struct Harness {
    blacklist: Arc<InMemoryBlacklist>,
    directory: Arc<InMemoryAgencyDirectory>,
}

impl Harness {
    fn new() -> Self {
        Self {
            blacklist: Arc::new(InMemoryBlacklist::new()),
            directory: Arc::new(InMemoryAgencyDirectory::new()),
        }
    }

    fn screening(&self) -> BlacklistScreening {
        BlacklistScreening::new(self.blacklist.clone(), self.directory.clone())
    }
}

#[tokio::test]
async fn test_clear_customer_yields_empty_report() {
    let harness = Harness::new();
    let report = harness
        .screening()
        .screen(IdentityQuery::by_national_id("09876543"))
        .await
        .unwrap();

    assert!(report.is_clear());
    assert!(report.agencies.is_empty());
    assert!(harness.directory.lookups().await.is_empty());
}

#[tokio::test]
async fn test_empty_query_is_rejected_before_any_call() {
    let harness = Harness::new();
    let result = harness.screening().screen(IdentityQuery::default()).await;

    assert!(matches!(result, Err(PartyError::EmptyIdentityQuery)));
}

#[tokio::test]
async fn test_hits_from_two_agencies_fetch_both_contacts() {
    let harness = Harness::new();
    let first = agency("Tunis Nord");
    let second = agency("Sfax Centre");
    let (first_id, second_id) = (first.id, second.id);
    harness.directory.insert(first).await;
    harness.directory.insert(second).await;
    harness.blacklist.insert(entry_for(first_id, "09876543")).await;
    harness.blacklist.insert(entry_for(second_id, "09876543")).await;

    let report = harness
        .screening()
        .screen(IdentityQuery::by_national_id("09876543"))
        .await
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.agencies.len(), 2);
    assert_eq!(report.agencies[&first_id].name, "Tunis Nord");
    assert_eq!(report.agencies[&second_id].name, "Sfax Centre");

    let lookups = harness.directory.lookups().await;
    assert!(lookups.contains(&first_id));
    assert!(lookups.contains(&second_id));
}

#[tokio::test]
async fn test_duplicate_agency_hits_fetch_contact_once() {
    let harness = Harness::new();
    let listing = agency("Tunis Nord");
    let listing_id = listing.id;
    harness.directory.insert(listing).await;
    harness.blacklist.insert(entry_for(listing_id, "09876543")).await;
    harness.blacklist.insert(entry_for(listing_id, "09876543")).await;

    let report = harness
        .screening()
        .screen(IdentityQuery::by_national_id("09876543"))
        .await
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.agencies.len(), 1);
    assert_eq!(harness.directory.lookups().await, vec![listing_id]);
}

#[tokio::test]
async fn test_one_failed_lookup_fails_the_batch() {
    let harness = Harness::new();
    let healthy = agency("Tunis Nord");
    let failing = agency("Sfax Centre");
    let (healthy_id, failing_id) = (healthy.id, failing.id);
    harness.directory.insert(healthy).await;
    harness.directory.insert(failing).await;
    harness.directory.fail_agency(failing_id).await;
    harness.blacklist.insert(entry_for(healthy_id, "09876543")).await;
    harness.blacklist.insert(entry_for(failing_id, "09876543")).await;

    let result = harness
        .screening()
        .screen(IdentityQuery::by_national_id("09876543"))
        .await;

    assert!(result.err().map(|e| e.is_transient()).unwrap_or(false));
}

#[tokio::test]
async fn test_unknown_agency_fails_screening() {
    let harness = Harness::new();
    let orphan = AgencyId::new();
    harness.blacklist.insert(entry_for(orphan, "09876543")).await;

    let result = harness
        .screening()
        .screen(IdentityQuery::by_national_id("09876543"))
        .await;

    assert!(matches!(
        result,
        Err(PartyError::Port(core_kernel::PortError::NotFound { .. }))
    ));
}
