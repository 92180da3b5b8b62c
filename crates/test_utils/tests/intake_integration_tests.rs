//! Cross-domain integration tests
//!
//! Exercises the accident intake workflow and the blacklist screening
//! end-to-end against the in-memory adapters, covering the scenarios the
//! agencies actually run through: declaring an accident on an idle car,
//! resolving an ongoing reservation, and screening a new customer.

use std::sync::Arc;

use core_kernel::{Currency, Money, Timezone};
use domain_accidents::{
    AccidentIntake, AccidentService, InMemoryAccidents, IntakeStep, ResolutionAction,
};
use domain_fleet::{InMemoryFleet, ReservationStatus};
use rust_decimal_macros::dec;

use test_utils::{
    assert_money_zero, assert_net_cost, MoneyFixtures, TemporalFixtures, TestAccidentBuilder,
    TestCarBuilder, TestReservationBuilder, TEST_AGENCY,
};

fn intake(fleet: &Arc<InMemoryFleet>, accidents: &Arc<InMemoryAccidents>) -> AccidentIntake {
    AccidentIntake::begin(
        TEST_AGENCY.id,
        Currency::TND,
        Timezone::default(),
        fleet.clone(),
        fleet.clone(),
        accidents.clone(),
    )
}

mod accident_intake {
    use super::*;

    #[tokio::test]
    async fn test_idle_car_declaration_end_to_end() {
        let fleet = Arc::new(InMemoryFleet::new());
        let accidents = Arc::new(InMemoryAccidents::new());
        let car = TestCarBuilder::new().build();
        fleet.insert_car(car.clone()).await;

        let mut wizard = intake(&fleet, &accidents);
        wizard
            .select_date_and_car(TemporalFixtures::accident_date(), car.clone())
            .await
            .unwrap();
        wizard.set_notes("fender bender").unwrap();
        let record = wizard.submit().await.unwrap();

        assert_eq!(record.reservation_id, None);
        assert_eq!(record.car_id, car.id);
        assert_eq!(record.notes, "fender bender");
        assert_money_zero(&record.net_cost());

        // The record is queryable through the service afterwards
        let listed = accidents.get_by_agency(TEST_AGENCY.id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_rented_car_complete_resolution_end_to_end() {
        let fleet = Arc::new(InMemoryFleet::new());
        let accidents = Arc::new(InMemoryAccidents::new());
        let car = TestCarBuilder::new().with_odometer(42_650).build();
        let reservation = TestReservationBuilder::new()
            .with_car(car.id)
            .with_customer_name("Leila Ben Salah")
            .picked_up(41_500)
            .build();
        let reservation_id = reservation.id;
        fleet.insert_car(car.clone()).await;
        fleet.insert_reservation(reservation).await;

        let mut wizard = intake(&fleet, &accidents);
        let step = wizard
            .select_date_and_car(TemporalFixtures::accident_date(), car.clone())
            .await
            .unwrap();
        assert!(matches!(step, IntakeStep::ReservationResolution { .. }));

        wizard
            .choose_resolution(ResolutionAction::Complete)
            .unwrap();
        wizard.set_notes("collision at the Marsa exit").unwrap();
        wizard
            .set_expert(Some("Mounir Gharbi".to_string()), Some("+216 98 123 456".to_string()))
            .unwrap();
        let record = wizard.submit().await.unwrap();

        // The reservation was returned with the car's odometer before
        // the accident was created
        let returns = fleet.returned_calls().await;
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].1.odometer_end, 42_650);
        assert_eq!(
            fleet.reservation(reservation_id).await.unwrap().status,
            ReservationStatus::Completed
        );
        assert_eq!(record.reservation_id, Some(reservation_id));
        assert_eq!(record.expert_full_name.as_deref(), Some("Mounir Gharbi"));
    }

    #[tokio::test]
    async fn test_expense_tracking_after_declaration() {
        let accidents = Arc::new(InMemoryAccidents::new());

        let record = accidents
            .create(TestAccidentBuilder::new().with_notes("hail damage").build())
            .await
            .unwrap();

        accidents
            .add_expense(
                record.id,
                "bodywork".to_string(),
                MoneyFixtures::bodywork_expense(),
                None,
            )
            .await
            .unwrap();
        accidents
            .add_refund(
                record.id,
                "insurance payout".to_string(),
                MoneyFixtures::insurance_payout(),
                None,
            )
            .await
            .unwrap();

        let stored = accidents.get_by_id(record.id).await.unwrap();
        assert_net_cost(&stored, &Money::new(dec!(250.000), Currency::TND));
    }
}

mod blacklist_screening {
    use super::*;
    use chrono::Utc;
    use core_kernel::BlacklistEntryId;
    use domain_party::{
        Agency, BlacklistEntry, BlacklistScreening, IdentityQuery, InMemoryAgencyDirectory,
        InMemoryBlacklist,
    };

    #[tokio::test]
    async fn test_new_customer_screened_against_two_agencies() {
        let blacklist = Arc::new(InMemoryBlacklist::new());
        let directory = Arc::new(InMemoryAgencyDirectory::new());

        let sfax = Agency::new(
            "Sfax Centre",
            "sfax@rental.tn",
            "+216 74 000 000",
            "Sfax",
            Timezone::default(),
            Currency::TND,
        );
        let sousse = Agency::new(
            "Sousse Plage",
            "sousse@rental.tn",
            "+216 73 000 000",
            "Sousse",
            Timezone::default(),
            Currency::TND,
        );
        for (agency, reason) in [(&sfax, "unpaid damages"), (&sousse, "abandoned vehicle")] {
            blacklist
                .insert(BlacklistEntry {
                    id: BlacklistEntryId::new(),
                    agency_id: agency.id,
                    full_name: "Karim Jlassi".to_string(),
                    national_id: Some("X".to_string()),
                    passport_id: None,
                    license_number: None,
                    reason: reason.to_string(),
                    listed_at: Utc::now(),
                })
                .await;
        }
        directory.insert(sfax.clone()).await;
        directory.insert(sousse.clone()).await;

        let report = BlacklistScreening::new(blacklist, directory.clone())
            .screen(IdentityQuery::by_national_id("X"))
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        assert!(!report.is_clear());
        // Both contact cards are available for the contact modal
        assert_eq!(report.agencies[&sfax.id].phone, "+216 74 000 000");
        assert_eq!(report.agencies[&sousse.id].phone, "+216 73 000 000");
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::charge_list_strategy;

    proptest! {
        /// Net cost stays consistent when charges flow through the
        /// service rather than the aggregate directly
        #[test]
        fn net_cost_matches_sums_through_the_service(
            expenses in charge_list_strategy(),
            refunds in charge_list_strategy()
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime");
            runtime.block_on(async {
                let accidents = InMemoryAccidents::new();
                let record = accidents
                    .create(TestAccidentBuilder::new().build())
                    .await
                    .unwrap();

                let mut expected = MoneyFixtures::zero();
                for (i, amount) in expenses.iter().enumerate() {
                    accidents
                        .add_expense(record.id, format!("e{}", i), *amount, None)
                        .await
                        .unwrap();
                    expected = expected + *amount;
                }
                for (i, amount) in refunds.iter().enumerate() {
                    accidents
                        .add_refund(record.id, format!("r{}", i), *amount, None)
                        .await
                        .unwrap();
                    expected = expected - *amount;
                }

                let stored = accidents.get_by_id(record.id).await.unwrap();
                prop_assert_eq!(stored.net_cost(), expected);
                Ok(())
            })?;
        }
    }
}
