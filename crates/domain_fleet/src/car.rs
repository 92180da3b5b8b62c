//! Car aggregate

use serde::{Deserialize, Serialize};

use core_kernel::{AgencyId, CarId};

/// Operational status of a fleet vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarStatus {
    Available,
    Rented,
    InMaintenance,
}

/// A vehicle in an agency's fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    /// Unique identifier
    pub id: CarId,
    /// Owning agency
    pub agency_id: AgencyId,
    /// Manufacturer
    pub make: String,
    /// Model name
    pub model: String,
    /// Registration plate
    pub plate_number: String,
    /// Last known odometer reading in kilometres
    pub current_km: u32,
    /// Operational status
    pub status: CarStatus,
}

impl Car {
    /// Creates a new available car
    pub fn new(
        agency_id: AgencyId,
        make: impl Into<String>,
        model: impl Into<String>,
        plate_number: impl Into<String>,
        current_km: u32,
    ) -> Self {
        Self {
            id: CarId::new_v7(),
            agency_id,
            make: make.into(),
            model: model.into(),
            plate_number: plate_number.into(),
            current_km,
            status: CarStatus::Available,
        }
    }

    /// Label shown in car pickers: "make model (plate)"
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.plate_number)
    }

    /// Records a new odometer reading; readings never go backwards
    pub fn record_odometer(&mut self, km: u32) {
        if km > self.current_km {
            self.current_km = km;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let car = Car::new(AgencyId::new(), "Kia", "Picanto", "220 TN 4581", 42_000);
        assert_eq!(car.display_name(), "Kia Picanto (220 TN 4581)");
    }

    #[test]
    fn test_odometer_never_regresses() {
        let mut car = Car::new(AgencyId::new(), "Kia", "Picanto", "220 TN 4581", 42_000);
        car.record_odometer(41_000);
        assert_eq!(car.current_km, 42_000);
        car.record_odometer(43_500);
        assert_eq!(car.current_km, 43_500);
    }
}
