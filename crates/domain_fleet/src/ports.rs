//! Fleet Domain Ports
//!
//! Port interfaces for the car and reservation lookups the platform
//! backend exposes. The intake workflow and availability screens consume
//! these traits; adapters implement them against the REST gateway, and
//! the in-memory mock below backs the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{AgencyId, CarId, CustomerId, DateRange, DomainPort, PortError, ReservationId};

use crate::car::Car;
use crate::reservation::{Reservation, ReturnDetails};

/// Read access to an agency's fleet
#[async_trait]
pub trait CarLookup: DomainPort {
    /// All cars belonging to an agency
    async fn get_by_agency(&self, agency_id: AgencyId) -> Result<Vec<Car>, PortError>;

    /// Reservations of a car whose rental window overlaps the given
    /// instant, in backend return order
    async fn check_car_reservations_by_date(
        &self,
        car_id: CarId,
        date: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, PortError>;
}

/// Reservation operations used by the intake and swap flows
#[async_trait]
pub trait ReservationService: DomainPort {
    /// Cars free over the whole range, optionally excluding one vehicle
    /// (the one being swapped away from)
    async fn get_available_cars(
        &self,
        range: DateRange,
        exclude_car: Option<CarId>,
    ) -> Result<Vec<Car>, PortError>;

    /// Reassigns a reservation to another vehicle
    async fn update_reservation_car(
        &self,
        id: ReservationId,
        new_car: CarId,
    ) -> Result<(), PortError>;

    /// Records a vehicle return, closing the reservation
    async fn return_car(&self, id: ReservationId, ret: ReturnDetails) -> Result<(), PortError>;

    /// All reservations of a customer
    async fn get_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::Timezone;
    use crate::reservation::ReservationStatus;

    /// In-memory implementation of both fleet ports
    ///
    /// Backs the test suite; preserves insertion order so first-match
    /// policies can be asserted, and records every mutating call.
    #[derive(Debug, Default)]
    pub struct InMemoryFleet {
        cars: Arc<RwLock<Vec<Car>>>,
        reservations: Arc<RwLock<Vec<Reservation>>>,
        returned_calls: Arc<RwLock<Vec<(ReservationId, ReturnDetails)>>>,
        reassigned_calls: Arc<RwLock<Vec<(ReservationId, CarId)>>>,
        fail_next_return: AtomicBool,
    }

    impl InMemoryFleet {
        /// Creates an empty fleet
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a car
        pub async fn insert_car(&self, car: Car) {
            self.cars.write().await.push(car);
        }

        /// Adds a reservation
        pub async fn insert_reservation(&self, reservation: Reservation) {
            self.reservations.write().await.push(reservation);
        }

        /// Arms a one-shot failure for the next return_car call
        pub fn fail_next_return(&self) {
            self.fail_next_return.store(true, Ordering::SeqCst);
        }

        /// Return calls received so far
        pub async fn returned_calls(&self) -> Vec<(ReservationId, ReturnDetails)> {
            self.returned_calls.read().await.clone()
        }

        /// Car-reassignment calls received so far
        pub async fn reassigned_calls(&self) -> Vec<(ReservationId, CarId)> {
            self.reassigned_calls.read().await.clone()
        }

        /// Current state of a stored reservation
        pub async fn reservation(&self, id: ReservationId) -> Option<Reservation> {
            self.reservations
                .read()
                .await
                .iter()
                .find(|r| r.id == id)
                .cloned()
        }
    }

    impl DomainPort for InMemoryFleet {}

    #[async_trait]
    impl CarLookup for InMemoryFleet {
        async fn get_by_agency(&self, agency_id: AgencyId) -> Result<Vec<Car>, PortError> {
            Ok(self
                .cars
                .read()
                .await
                .iter()
                .filter(|c| c.agency_id == agency_id)
                .cloned()
                .collect())
        }

        async fn check_car_reservations_by_date(
            &self,
            car_id: CarId,
            date: DateTime<Utc>,
        ) -> Result<Vec<Reservation>, PortError> {
            Ok(self
                .reservations
                .read()
                .await
                .iter()
                .filter(|r| r.car_id == car_id && r.covers(date))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl ReservationService for InMemoryFleet {
        async fn get_available_cars(
            &self,
            range: DateRange,
            exclude_car: Option<CarId>,
        ) -> Result<Vec<Car>, PortError> {
            let window = range.to_rental_period(&Timezone::default());
            let reservations = self.reservations.read().await;
            let busy: Vec<CarId> = reservations
                .iter()
                .filter(|r| {
                    matches!(
                        r.status,
                        ReservationStatus::Upcoming | ReservationStatus::Ongoing
                    ) && r.period.overlaps(&window)
                })
                .map(|r| r.car_id)
                .collect();

            Ok(self
                .cars
                .read()
                .await
                .iter()
                .filter(|c| !busy.contains(&c.id) && Some(c.id) != exclude_car)
                .cloned()
                .collect())
        }

        async fn update_reservation_car(
            &self,
            id: ReservationId,
            new_car: CarId,
        ) -> Result<(), PortError> {
            let mut reservations = self.reservations.write().await;
            let reservation = reservations
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Reservation", id))?;

            reservation
                .reassign_car(new_car)
                .map_err(|e| PortError::conflict(e.to_string()))?;
            self.reassigned_calls.write().await.push((id, new_car));
            Ok(())
        }

        async fn return_car(&self, id: ReservationId, ret: ReturnDetails) -> Result<(), PortError> {
            if self.fail_next_return.swap(false, Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "reservations".to_string(),
                });
            }

            let mut reservations = self.reservations.write().await;
            let reservation = reservations
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Reservation", id))?;

            reservation
                .complete(ret)
                .map_err(|e| PortError::conflict(e.to_string()))?;
            self.returned_calls.write().await.push((id, ret));
            Ok(())
        }

        async fn get_by_customer(
            &self,
            customer_id: CustomerId,
        ) -> Result<Vec<Reservation>, PortError> {
            Ok(self
                .reservations
                .read()
                .await
                .iter()
                .filter(|r| r.customer_id == customer_id)
                .cloned()
                .collect())
        }
    }
}
