//! Accident intake workflow
//!
//! Drives the three-step declaration wizard. The step is a tagged enum,
//! so a linked reservation without a chosen action, or accident details
//! without a car, cannot be represented.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::{AccidentId, AgencyId, CarId, Currency, DateRange, PortError, Timezone};
use domain_fleet::{Car, CarLookup, Reservation, ReservationService, ReturnDetails};

use crate::accident::AccidentRecord;
use crate::conflict::ConflictCheck;
use crate::draft::{AccidentDraft, DraftIssue};
use crate::error::IntakeError;
use crate::ports::AccidentService;

/// What the user decided to do about the ongoing reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionAction {
    /// Close the reservation: the vehicle comes back with the accident
    Complete,
    /// Leave the reservation untouched; the accident still links to it
    Ignore,
    /// Move the reservation onto a replacement vehicle
    SwapCar,
}

/// The reservation carried into the details step, with the decision made
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedReservation {
    pub reservation: Reservation,
    pub action: ResolutionAction,
}

/// Current position in the intake wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IntakeStep {
    /// Picking the accident date and the damaged car
    DateAndCar,
    /// An ongoing reservation covers the date; the user must decide
    ReservationResolution {
        conflict: Reservation,
        action: Option<ResolutionAction>,
    },
    /// Entering notes and expert details
    AccidentDetails { linked: Option<LinkedReservation> },
    /// Terminal: the record was created
    Submitted { accident_id: AccidentId },
}

impl IntakeStep {
    /// Step name used in errors and traces
    pub fn name(&self) -> &'static str {
        match self {
            IntakeStep::DateAndCar => "date-and-car",
            IntakeStep::ReservationResolution { .. } => "reservation-resolution",
            IntakeStep::AccidentDetails { .. } => "accident-details",
            IntakeStep::Submitted { .. } => "submitted",
        }
    }
}

/// The intake wizard controller
///
/// Owns the draft for the duration of the declaration; the draft is
/// dropped with the controller on abandon, and survives failed
/// submissions so the user can retry.
pub struct AccidentIntake {
    agency_id: AgencyId,
    currency: Currency,
    timezone: Timezone,
    draft: AccidentDraft,
    selected_car: Option<Car>,
    step: IntakeStep,
    reservation_returned: bool,
    conflicts: ConflictCheck,
    cars: Arc<dyn CarLookup>,
    reservations: Arc<dyn ReservationService>,
    accidents: Arc<dyn AccidentService>,
}

impl AccidentIntake {
    /// Starts a new declaration for an agency
    pub fn begin(
        agency_id: AgencyId,
        currency: Currency,
        timezone: Timezone,
        cars: Arc<dyn CarLookup>,
        reservations: Arc<dyn ReservationService>,
        accidents: Arc<dyn AccidentService>,
    ) -> Self {
        Self {
            agency_id,
            currency,
            timezone,
            draft: AccidentDraft::new(),
            selected_car: None,
            step: IntakeStep::DateAndCar,
            reservation_returned: false,
            conflicts: ConflictCheck::new(cars.clone()),
            cars,
            reservations,
            accidents,
        }
    }

    /// The current wizard step
    pub fn step(&self) -> &IntakeStep {
        &self.step
    }

    /// The in-progress draft
    pub fn draft(&self) -> &AccidentDraft {
        &self.draft
    }

    /// The car picked in step one, if any
    pub fn selected_car(&self) -> Option<&Car> {
        self.selected_car.as_ref()
    }

    /// Car choices for step one
    pub async fn agency_cars(&self) -> Result<Vec<Car>, IntakeError> {
        Ok(self.cars.get_by_agency(self.agency_id).await?)
    }

    /// Step one: records the date and car, then runs the conflict check
    ///
    /// Moves to `ReservationResolution` when the car is out on an ongoing
    /// reservation covering the date, straight to `AccidentDetails`
    /// otherwise. A failed check leaves the step unchanged.
    pub async fn select_date_and_car(
        &mut self,
        date: DateTime<Utc>,
        car: Car,
    ) -> Result<&IntakeStep, IntakeError> {
        if !matches!(self.step, IntakeStep::DateAndCar) {
            return Err(self.wrong_step("select_date_and_car"));
        }
        if date > Utc::now() {
            return Err(IntakeError::Validation(vec![DraftIssue {
                field: "accident_date",
                message: "accident date must not be in the future".to_string(),
            }]));
        }

        let conflict = self.conflicts.find_conflict(car.id, date).await?;

        self.draft.accident_date = Some(date);
        self.draft.car_id = Some(car.id);
        self.draft.reservation_id = None;
        self.selected_car = Some(car);
        self.reservation_returned = false;

        match conflict {
            Some(reservation) => {
                info!(
                    reservation = %reservation.id,
                    customer = %reservation.customer_name,
                    "ongoing reservation covers the accident date"
                );
                self.step = IntakeStep::ReservationResolution {
                    conflict: reservation,
                    action: None,
                };
            }
            None => {
                info!("no ongoing reservation, continuing to details");
                self.step = IntakeStep::AccidentDetails { linked: None };
            }
        }
        Ok(&self.step)
    }

    /// Step two: decides what happens to the conflicting reservation
    ///
    /// `Complete` and `Ignore` advance to the details step with the
    /// reservation linked. `SwapCar` stays on this step until
    /// [`swap_car`](Self::swap_car) succeeds.
    pub fn choose_resolution(
        &mut self,
        action: ResolutionAction,
    ) -> Result<&IntakeStep, IntakeError> {
        let step_name = self.step.name();
        let IntakeStep::ReservationResolution { conflict, action: chosen } = &mut self.step else {
            return Err(IntakeError::WrongStep {
                step: step_name,
                operation: "choose_resolution",
            });
        };

        match action {
            ResolutionAction::SwapCar => {
                *chosen = Some(ResolutionAction::SwapCar);
            }
            ResolutionAction::Complete | ResolutionAction::Ignore => {
                let reservation = conflict.clone();
                self.draft.reservation_id = Some(reservation.id);
                info!(reservation = %reservation.id, ?action, "reservation resolution chosen");
                self.step = IntakeStep::AccidentDetails {
                    linked: Some(LinkedReservation { reservation, action }),
                };
            }
        }
        Ok(&self.step)
    }

    /// Replacement choices for a car swap: vehicles free over the
    /// conflicting reservation's dates, excluding its current car
    pub async fn swap_candidates(&self) -> Result<Vec<Car>, IntakeError> {
        let IntakeStep::ReservationResolution { conflict, .. } = &self.step else {
            return Err(self.wrong_step("swap_candidates"));
        };

        let range = self.reservation_dates(conflict)?;
        Ok(self
            .reservations
            .get_available_cars(range, Some(conflict.car_id))
            .await?)
    }

    /// Completes a swap: reassigns the reservation, links it, and moves
    /// on to the details step
    ///
    /// The draft keeps the car picked in step one: the accident happened
    /// to the original vehicle, regardless of which car the reservation
    /// continues on.
    pub async fn swap_car(&mut self, new_car: CarId) -> Result<&IntakeStep, IntakeError> {
        let IntakeStep::ReservationResolution { conflict, .. } = &self.step else {
            return Err(self.wrong_step("swap_car"));
        };
        let mut reservation = conflict.clone();

        self.reservations
            .update_reservation_car(reservation.id, new_car)
            .await
            .map_err(|e| {
                warn!(reservation = %reservation.id, error = %e, "car swap failed");
                e
            })?;

        reservation.car_id = new_car;
        self.draft.reservation_id = Some(reservation.id);
        info!(reservation = %reservation.id, car = %new_car, "reservation moved to replacement car");
        self.step = IntakeStep::AccidentDetails {
            linked: Some(LinkedReservation {
                reservation,
                action: ResolutionAction::SwapCar,
            }),
        };
        Ok(&self.step)
    }

    /// Updates the accident description
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), IntakeError> {
        if !matches!(self.step, IntakeStep::AccidentDetails { .. }) {
            return Err(self.wrong_step("set_notes"));
        }
        self.draft.notes = notes.into();
        Ok(())
    }

    /// Records the insurance expert assigned to the file
    pub fn set_expert(
        &mut self,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Result<(), IntakeError> {
        if !matches!(self.step, IntakeStep::AccidentDetails { .. }) {
            return Err(self.wrong_step("set_expert"));
        }
        self.draft.expert_full_name = full_name;
        self.draft.expert_phone = phone;
        Ok(())
    }

    /// Back navigation
    ///
    /// Details returns to the resolution step when a reservation was
    /// linked (unlinking it and clearing the decision), to the first step
    /// otherwise; the resolution step always returns to the first step.
    pub fn go_back(&mut self) -> Result<&IntakeStep, IntakeError> {
        match std::mem::replace(&mut self.step, IntakeStep::DateAndCar) {
            IntakeStep::DateAndCar => {
                return Err(IntakeError::WrongStep {
                    step: "date-and-car",
                    operation: "go_back",
                });
            }
            IntakeStep::ReservationResolution { .. } => {
                self.draft.reservation_id = None;
            }
            IntakeStep::AccidentDetails { linked } => match linked {
                Some(LinkedReservation { reservation, .. }) => {
                    self.draft.reservation_id = None;
                    self.step = IntakeStep::ReservationResolution {
                        conflict: reservation,
                        action: None,
                    };
                }
                None => {}
            },
            step @ IntakeStep::Submitted { .. } => {
                self.step = step;
                return Err(IntakeError::WrongStep {
                    step: "submitted",
                    operation: "go_back",
                });
            }
        }
        Ok(&self.step)
    }

    /// Final step: validates the draft and persists the accident
    ///
    /// When the chosen action was `Complete`, the linked reservation is
    /// returned first — exactly once, even across retries — with the
    /// current timestamp and the car's last known odometer reading. The
    /// two backend calls are not atomic: a create failure after a
    /// successful return leaves the reservation closed, and the intact
    /// draft lets the user retry the create alone.
    pub async fn submit(&mut self) -> Result<AccidentRecord, IntakeError> {
        let linked = match &self.step {
            IntakeStep::AccidentDetails { linked } => linked.clone(),
            _ => return Err(self.wrong_step("submit")),
        };

        let now = Utc::now();
        let payload = self
            .draft
            .submission_payload(self.agency_id, self.currency, now)
            .map_err(IntakeError::Validation)?;

        if let Some(LinkedReservation {
            reservation,
            action: ResolutionAction::Complete,
        }) = &linked
        {
            if !self.reservation_returned {
                let Some(car) = self.selected_car.as_ref() else {
                    return Err(IntakeError::Validation(vec![DraftIssue {
                        field: "car_id",
                        message: "a car must be selected".to_string(),
                    }]));
                };
                let odometer_end = car.current_km;
                let ret = ReturnDetails {
                    return_date: now,
                    odometer_end,
                };
                self.reservations
                    .return_car(reservation.id, ret)
                    .await
                    .map_err(|e| {
                        warn!(reservation = %reservation.id, error = %e, "vehicle return failed");
                        e
                    })?;
                self.reservation_returned = true;
                info!(reservation = %reservation.id, "reservation closed before accident creation");
            }
        }

        let record = self.accidents.create(payload).await.map_err(|e| {
            warn!(error = %e, "accident creation failed, draft preserved");
            e
        })?;

        info!(accident = %record.id, car = %record.car_id, "accident declared");
        self.step = IntakeStep::Submitted {
            accident_id: record.id,
        };
        Ok(record)
    }

    fn wrong_step(&self, operation: &'static str) -> IntakeError {
        IntakeError::WrongStep {
            step: self.step.name(),
            operation,
        }
    }

    fn reservation_dates(&self, reservation: &Reservation) -> Result<DateRange, PortError> {
        let start = self.timezone.to_local(reservation.period.start).date_naive();
        let end = reservation
            .period
            .end
            .map(|e| self.timezone.to_local(e).date_naive())
            .unwrap_or(start);
        DateRange::new(start, end).map_err(|e| PortError::validation(e.to_string()))
    }
}
