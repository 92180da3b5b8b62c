//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the rental
//! platform. These fixtures are designed to be consistent and predictable
//! for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;

use core_kernel::{AgencyId, CarId, Currency, CustomerId, Money, RentalPeriod, Timezone};
use domain_party::Agency;
use rust_decimal_macros::dec;

/// The shared test agency every fixture hangs off
pub static TEST_AGENCY: Lazy<Agency> = Lazy::new(|| {
    Agency::new(
        "Tunis Nord",
        "tunis.nord@rental.tn",
        "+216 71 000 000",
        "12 Avenue de Carthage, Tunis",
        Timezone::default(),
        Currency::TND,
    )
});

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The standard daily rate used in reservation fixtures
    pub fn daily_rate() -> Money {
        Money::new(dec!(90.000), Currency::TND)
    }

    /// A typical bodywork expense
    pub fn bodywork_expense() -> Money {
        Money::new(dec!(850.000), Currency::TND)
    }

    /// A typical insurance payout
    pub fn insurance_payout() -> Money {
        Money::new(dec!(600.000), Currency::TND)
    }

    /// A zero amount in the fixture currency
    pub fn zero() -> Money {
        Money::zero(Currency::TND)
    }

    /// A EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard rental pickup (Mar 1, 2024, 09:00 UTC)
    pub fn rental_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// Standard scheduled return (Mar 8, 2024, 09:00 UTC)
    pub fn rental_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 9, 0, 0).unwrap()
    }

    /// An instant in the middle of the standard rental
    pub fn mid_rental() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
    }

    /// An instant after the standard rental
    pub fn after_rental() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    /// The standard one-week rental window
    pub fn one_week_rental() -> RentalPeriod {
        RentalPeriod::bounded(Self::rental_start(), Self::rental_end()).unwrap()
    }

    /// Standard accident date within the rental window
    pub fn accident_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 11, 0, 0).unwrap()
    }

    /// First day of the standard rental as a date
    pub fn rental_start_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn agency_id() -> AgencyId {
        TEST_AGENCY.id
    }

    pub fn car_id() -> CarId {
        CarId::new_v7()
    }

    pub fn customer_id() -> CustomerId {
        CustomerId::new_v7()
    }
}
