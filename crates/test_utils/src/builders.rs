//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use fake::faker::name::en::Name;
use fake::Fake;

use core_kernel::{AgencyId, CarId, Currency, CustomerId, Money, RentalPeriod};
use domain_accidents::NewAccident;
use domain_fleet::{Car, Reservation};

use crate::fixtures::{IdFixtures, MoneyFixtures, TemporalFixtures};

/// Builder for test cars
pub struct TestCarBuilder {
    agency_id: AgencyId,
    make: String,
    model: String,
    plate_number: String,
    current_km: u32,
}

impl Default for TestCarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCarBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            agency_id: IdFixtures::agency_id(),
            make: "Kia".to_string(),
            model: "Picanto".to_string(),
            plate_number: format!(
                "{} TN {}",
                (100u16..300).fake::<u16>(),
                (1000u16..9999).fake::<u16>()
            ),
            current_km: 42_000,
        }
    }

    /// Sets the owning agency
    pub fn with_agency(mut self, agency_id: AgencyId) -> Self {
        self.agency_id = agency_id;
        self
    }

    /// Sets make and model
    pub fn with_model(mut self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.make = make.into();
        self.model = model.into();
        self
    }

    /// Sets the odometer reading
    pub fn with_odometer(mut self, km: u32) -> Self {
        self.current_km = km;
        self
    }

    /// Builds the car
    pub fn build(self) -> Car {
        Car::new(
            self.agency_id,
            self.make,
            self.model,
            self.plate_number,
            self.current_km,
        )
    }
}

/// Builder for test reservations
pub struct TestReservationBuilder {
    car_id: CarId,
    customer_id: CustomerId,
    customer_name: String,
    period: RentalPeriod,
    daily_rate: Money,
    picked_up_at_km: Option<u32>,
}

impl Default for TestReservationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestReservationBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            car_id: IdFixtures::car_id(),
            customer_id: IdFixtures::customer_id(),
            customer_name: Name().fake(),
            period: TemporalFixtures::one_week_rental(),
            daily_rate: MoneyFixtures::daily_rate(),
            picked_up_at_km: None,
        }
    }

    /// Sets the reserved car
    pub fn with_car(mut self, car_id: CarId) -> Self {
        self.car_id = car_id;
        self
    }

    /// Sets the customer name
    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    /// Sets the rental window
    pub fn with_period(mut self, period: RentalPeriod) -> Self {
        self.period = period;
        self
    }

    /// Marks the reservation as picked up (Ongoing) at the given reading
    pub fn picked_up(mut self, odometer_start: u32) -> Self {
        self.picked_up_at_km = Some(odometer_start);
        self
    }

    /// Builds the reservation
    pub fn build(self) -> Reservation {
        let mut reservation = Reservation::book(
            self.car_id,
            self.customer_id,
            self.customer_name,
            self.period,
            self.daily_rate,
        );
        if let Some(km) = self.picked_up_at_km {
            reservation
                .pick_up(km)
                .expect("fresh reservation accepts pickup");
        }
        reservation
    }
}

/// Builder for accident declarations
pub struct TestAccidentBuilder {
    agency_id: AgencyId,
    car_id: CarId,
    reservation_id: Option<core_kernel::ReservationId>,
    notes: String,
    currency: Currency,
}

impl Default for TestAccidentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAccidentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            agency_id: IdFixtures::agency_id(),
            car_id: IdFixtures::car_id(),
            reservation_id: None,
            notes: "fender bender".to_string(),
            currency: Currency::TND,
        }
    }

    /// Sets the damaged car
    pub fn with_car(mut self, car_id: CarId) -> Self {
        self.car_id = car_id;
        self
    }

    /// Links a reservation
    pub fn with_reservation(mut self, id: core_kernel::ReservationId) -> Self {
        self.reservation_id = Some(id);
        self
    }

    /// Sets the description
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Builds the declaration payload
    pub fn build(self) -> NewAccident {
        NewAccident {
            agency_id: self.agency_id,
            car_id: self.car_id,
            reservation_id: self.reservation_id,
            accident_date: TemporalFixtures::accident_date(),
            notes: self.notes,
            expert_full_name: None,
            expert_phone: None,
            currency: self.currency,
        }
    }
}
