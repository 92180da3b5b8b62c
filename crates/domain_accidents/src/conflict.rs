//! Ongoing-reservation conflict detection
//!
//! An accident can only be declared against a car once the workflow knows
//! whether the car is currently out on a reservation. Only an Ongoing
//! reservation blocks; Upcoming, Completed, and Cancelled overlaps are
//! informational and never surface as conflicts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use core_kernel::{CarId, PortError};
use domain_fleet::{CarLookup, Reservation};

/// Picks the blocking conflict out of a reservation list
///
/// Returns the first reservation, in input order, that is Ongoing and
/// whose rental window covers the instant. The backend guarantees at most
/// one Ongoing reservation per car; if that invariant is ever violated
/// the first match in return order wins.
pub fn find_conflict(reservations: &[Reservation], instant: DateTime<Utc>) -> Option<&Reservation> {
    reservations
        .iter()
        .find(|r| r.is_ongoing() && r.covers(instant))
}

/// Conflict check against the car-lookup port
#[derive(Clone)]
pub struct ConflictCheck {
    cars: Arc<dyn CarLookup>,
}

impl ConflictCheck {
    pub fn new(cars: Arc<dyn CarLookup>) -> Self {
        Self { cars }
    }

    /// Queries the car's reservations overlapping the accident date and
    /// applies the Ongoing-only policy
    pub async fn find_conflict(
        &self,
        car_id: CarId,
        date: DateTime<Utc>,
    ) -> Result<Option<Reservation>, PortError> {
        let reservations = self
            .cars
            .check_car_reservations_by_date(car_id, date)
            .await
            .map_err(|e| {
                warn!(car = %car_id, error = %e, "conflict check failed");
                e
            })?;

        Ok(find_conflict(&reservations, date).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::{Currency, CustomerId, Money, RentalPeriod};
    use rust_decimal_macros::dec;

    fn reservation_over_march(car: CarId, name: &str) -> Reservation {
        Reservation::book(
            car,
            CustomerId::new(),
            name,
            RentalPeriod::bounded(
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 8, 9, 0, 0).unwrap(),
            )
            .unwrap(),
            Money::new(dec!(90.000), Currency::TND),
        )
    }

    fn march_4th() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_no_reservations_no_conflict() {
        assert!(find_conflict(&[], march_4th()).is_none());
    }

    #[test]
    fn test_upcoming_overlap_is_not_a_conflict() {
        let car = CarId::new();
        let upcoming = reservation_over_march(car, "Leila Ben Salah");

        assert!(find_conflict(&[upcoming], march_4th()).is_none());
    }

    #[test]
    fn test_ongoing_overlap_is_a_conflict() {
        let car = CarId::new();
        let mut ongoing = reservation_over_march(car, "Leila Ben Salah");
        ongoing.pick_up(42_000).unwrap();

        let conflict = find_conflict(std::slice::from_ref(&ongoing), march_4th());
        assert_eq!(conflict.map(|r| r.id), Some(ongoing.id));
    }

    #[test]
    fn test_ongoing_outside_window_is_ignored() {
        let car = CarId::new();
        let mut ongoing = reservation_over_march(car, "Leila Ben Salah");
        ongoing.pick_up(42_000).unwrap();

        let outside = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        assert!(find_conflict(std::slice::from_ref(&ongoing), outside).is_none());
    }

    #[test]
    fn test_first_ongoing_wins_in_input_order() {
        // The one-ongoing-per-car invariant is the backend's to keep;
        // when it breaks, the selection stays deterministic.
        let car = CarId::new();
        let mut first = reservation_over_march(car, "Leila Ben Salah");
        first.pick_up(42_000).unwrap();
        let mut second = reservation_over_march(car, "Sami Trabelsi");
        second.pick_up(43_000).unwrap();

        let both = vec![first.clone(), second];
        let conflict = find_conflict(&both, march_4th());
        assert_eq!(conflict.map(|r| r.id), Some(first.id));
    }
}
