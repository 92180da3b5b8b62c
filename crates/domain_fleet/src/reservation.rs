//! Reservation aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{CarId, CustomerId, Money, RentalPeriod, ReservationId};
use crate::error::FleetError;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Booked, vehicle not yet picked up
    Upcoming,
    /// Vehicle is out with the customer
    Ongoing,
    /// Vehicle returned
    Completed,
    /// Cancelled before pickup
    Cancelled,
}

/// Details recorded when a vehicle comes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDetails {
    /// When the vehicle was returned
    pub return_date: DateTime<Utc>,
    /// Odometer reading at return, in kilometres
    pub odometer_end: u32,
}

/// A rental reservation binding a customer to a car over a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier
    pub id: ReservationId,
    /// Assigned vehicle
    pub car_id: CarId,
    /// Renting customer
    pub customer_id: CustomerId,
    /// Customer display name, denormalized for list screens
    pub customer_name: String,
    /// Scheduled rental window; closed at the actual return instant
    pub period: RentalPeriod,
    /// Status
    pub status: ReservationStatus,
    /// Agreed daily rate
    pub daily_rate: Money,
    /// Odometer reading at pickup, recorded when the rental starts
    pub odometer_start: Option<u32>,
    /// Return record, present once completed
    pub return_details: Option<ReturnDetails>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new upcoming reservation
    pub fn book(
        car_id: CarId,
        customer_id: CustomerId,
        customer_name: impl Into<String>,
        period: RentalPeriod,
        daily_rate: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReservationId::new_v7(),
            car_id,
            customer_id,
            customer_name: customer_name.into(),
            period,
            status: ReservationStatus::Upcoming,
            daily_rate,
            odometer_start: None,
            return_details: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Starts the rental: the customer picks the vehicle up
    pub fn pick_up(&mut self, odometer_start: u32) -> Result<(), FleetError> {
        self.transition_to(ReservationStatus::Ongoing)?;
        self.odometer_start = Some(odometer_start);
        Ok(())
    }

    /// Completes the rental: records the return and closes the period
    /// at the actual return instant
    pub fn complete(&mut self, ret: ReturnDetails) -> Result<(), FleetError> {
        if let Some(start) = self.odometer_start {
            if ret.odometer_end < start {
                return Err(FleetError::OdometerRegression {
                    start,
                    end: ret.odometer_end,
                });
            }
        }
        if !self.can_transition_to(ReservationStatus::Completed) {
            return Err(FleetError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", ReservationStatus::Completed),
            });
        }
        self.period.close_at(ret.return_date)?;
        self.status = ReservationStatus::Completed;
        self.return_details = Some(ret);
        self.updated_at = Utc::now();
        info!(reservation = %self.id, odometer = ret.odometer_end, "vehicle returned");
        Ok(())
    }

    /// Cancels the reservation before pickup
    pub fn cancel(&mut self) -> Result<(), FleetError> {
        self.transition_to(ReservationStatus::Cancelled)
    }

    /// Moves the reservation onto another vehicle
    ///
    /// Allowed while the reservation is Upcoming or Ongoing; completed or
    /// cancelled reservations keep their historical car.
    pub fn reassign_car(&mut self, new_car: CarId) -> Result<(), FleetError> {
        match self.status {
            ReservationStatus::Upcoming | ReservationStatus::Ongoing => {
                info!(reservation = %self.id, from = %self.car_id, to = %new_car, "car reassigned");
                self.car_id = new_car;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(FleetError::CarReassignmentNotAllowed {
                status: format!("{:?}", self.status),
            }),
        }
    }

    /// Returns true when the rental window contains the instant
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        self.period.contains(instant)
    }

    /// Returns true when the vehicle is currently out
    pub fn is_ongoing(&self) -> bool {
        self.status == ReservationStatus::Ongoing
    }

    /// Total charge for the scheduled window: daily rate times rental
    /// days, minimum one day, rounded to the currency
    pub fn rental_charge(&self) -> Money {
        let days = self
            .period
            .duration()
            .map(|d| {
                let whole = d.num_days();
                if d - chrono::Duration::days(whole) > chrono::Duration::zero() {
                    whole + 1
                } else {
                    whole
                }
            })
            .unwrap_or(1)
            .max(1);
        self.daily_rate
            .multiply(Decimal::from(days))
            .round_to_currency()
    }

    fn transition_to(&mut self, target: ReservationStatus) -> Result<(), FleetError> {
        if !self.can_transition_to(target) {
            return Err(FleetError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", target),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Checks if transition is valid
    fn can_transition_to(&self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self.status, target),
            (Upcoming, Ongoing) | (Upcoming, Cancelled) | (Ongoing, Completed)
        )
    }
}
