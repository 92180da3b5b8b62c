//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{Currency, Money, RentalPeriod};

/// Strategy for generating deployment currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::TND),
        Just(Currency::MAD),
        Just(Currency::DZD),
        Just(Currency::EUR),
        Just(Currency::USD),
    ]
}

/// Strategy for non-negative amounts in minor units, the range expense
/// and refund amounts live in
pub fn charge_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Strategy for non-negative TND amounts
pub fn tnd_charge_strategy() -> impl Strategy<Value = Money> {
    charge_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::TND))
}

/// Strategy for lists of expense or refund amounts
pub fn charge_list_strategy() -> impl Strategy<Value = Vec<Money>> {
    proptest::collection::vec(tnd_charge_strategy(), 0..8)
}

/// Strategy for bounded rental periods of 1 to 30 days starting in
/// early 2024
pub fn rental_period_strategy() -> impl Strategy<Value = RentalPeriod> {
    (0i64..365, 1i64..30).prop_map(|(offset_days, length_days)| {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::days(offset_days);
        RentalPeriod::bounded(start, start + Duration::days(length_days))
            .expect("positive length keeps bounds ordered")
    })
}
