//! Accident record aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccidentId, AgencyId, CarId, Currency, ExpenseId, Money, RefundId, ReservationId,
};
use crate::error::AccidentError;
use crate::ports::NewAccident;

/// Accident status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccidentStatus {
    /// Declared, vehicle not yet in the shop
    Created,
    /// Vehicle under repair
    Maintenance,
    /// Repairs done, file closed
    Completed,
}

/// A repair or handling cost attached to an accident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: Money,
    /// Stored path of the uploaded invoice, when one was attached
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A recovered amount (insurance payout, third-party reimbursement)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: RefundId,
    pub name: String,
    pub amount: Money,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An accident declared against a fleet vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Unique identifier
    pub id: AccidentId,
    /// Agency the vehicle belongs to
    pub agency_id: AgencyId,
    /// The vehicle the accident happened to
    pub car_id: CarId,
    /// Reservation the vehicle was out on, when one was linked at intake
    pub reservation_id: Option<ReservationId>,
    /// When the accident occurred
    pub accident_date: DateTime<Utc>,
    /// Free-form description
    pub notes: String,
    /// Insurance expert assigned to the file
    pub expert_full_name: Option<String>,
    pub expert_phone: Option<String>,
    /// Status
    pub status: AccidentStatus,
    /// Currency all expenses and refunds are recorded in
    pub currency: Currency,
    /// Costs incurred
    pub expenses: Vec<Expense>,
    /// Amounts recovered
    pub refunds: Vec<Refund>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl AccidentRecord {
    /// Registers a newly declared accident
    pub fn register(new: NewAccident) -> Self {
        let now = Utc::now();
        Self {
            id: AccidentId::new_v7(),
            agency_id: new.agency_id,
            car_id: new.car_id,
            reservation_id: new.reservation_id,
            accident_date: new.accident_date,
            notes: new.notes,
            expert_full_name: new.expert_full_name,
            expert_phone: new.expert_phone,
            status: AccidentStatus::Created,
            currency: new.currency,
            expenses: Vec::new(),
            refunds: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Updates the status
    pub fn update_status(&mut self, status: AccidentStatus) -> Result<(), AccidentError> {
        if !self.can_transition_to(status) {
            return Err(AccidentError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", status),
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records an expense; amounts must be non-negative and in the
    /// record's currency
    pub fn add_expense(
        &mut self,
        name: impl Into<String>,
        amount: Money,
        file_path: Option<String>,
    ) -> Result<Expense, AccidentError> {
        self.check_amount(&amount)?;
        let expense = Expense {
            id: ExpenseId::new_v7(),
            name: name.into(),
            amount,
            file_path,
            created_at: Utc::now(),
        };
        self.expenses.push(expense.clone());
        self.updated_at = Utc::now();
        Ok(expense)
    }

    /// Removes an expense by id
    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, AccidentError> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AccidentError::ExpenseNotFound(id.to_string()))?;
        self.updated_at = Utc::now();
        Ok(self.expenses.remove(position))
    }

    /// Records a refund; same amount rules as expenses
    pub fn add_refund(
        &mut self,
        name: impl Into<String>,
        amount: Money,
        file_path: Option<String>,
    ) -> Result<Refund, AccidentError> {
        self.check_amount(&amount)?;
        let refund = Refund {
            id: RefundId::new_v7(),
            name: name.into(),
            amount,
            file_path,
            created_at: Utc::now(),
        };
        self.refunds.push(refund.clone());
        self.updated_at = Utc::now();
        Ok(refund)
    }

    /// Removes a refund by id
    pub fn remove_refund(&mut self, id: RefundId) -> Result<Refund, AccidentError> {
        let position = self
            .refunds
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AccidentError::RefundNotFound(id.to_string()))?;
        self.updated_at = Utc::now();
        Ok(self.refunds.remove(position))
    }

    /// Sum of all expenses
    pub fn total_expenses(&self) -> Money {
        self.expenses
            .iter()
            .fold(Money::zero(self.currency), |acc, e| acc + e.amount)
    }

    /// Sum of all refunds
    pub fn total_refunds(&self) -> Money {
        self.refunds
            .iter()
            .fold(Money::zero(self.currency), |acc, r| acc + r.amount)
    }

    /// What the accident cost the agency: expenses minus refunds
    ///
    /// Recomputed on every call, never stored; negative when refunds
    /// exceed expenses.
    pub fn net_cost(&self) -> Money {
        self.total_expenses() - self.total_refunds()
    }

    fn check_amount(&self, amount: &Money) -> Result<(), AccidentError> {
        if amount.is_negative() {
            return Err(AccidentError::NegativeAmount(amount.to_string()));
        }
        if amount.currency() != self.currency {
            return Err(AccidentError::CurrencyMismatch {
                expected: self.currency.to_string(),
                got: amount.currency().to_string(),
            });
        }
        Ok(())
    }

    /// Checks if transition is valid
    fn can_transition_to(&self, target: AccidentStatus) -> bool {
        use AccidentStatus::*;
        matches!(
            (self.status, target),
            (Created, Maintenance) | (Created, Completed) | (Maintenance, Completed)
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn record_with(expenses: Vec<i64>, refunds: Vec<i64>) -> AccidentRecord {
        let mut record = AccidentRecord::register(NewAccident {
            agency_id: AgencyId::new(),
            car_id: CarId::new(),
            reservation_id: None,
            accident_date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            notes: "prop".to_string(),
            expert_full_name: None,
            expert_phone: None,
            currency: Currency::TND,
        });
        for (i, minor) in expenses.into_iter().enumerate() {
            record
                .add_expense(format!("e{}", i), Money::from_minor(minor, Currency::TND), None)
                .unwrap();
        }
        for (i, minor) in refunds.into_iter().enumerate() {
            record
                .add_refund(format!("r{}", i), Money::from_minor(minor, Currency::TND), None)
                .unwrap();
        }
        record
    }

    proptest! {
        #[test]
        fn net_cost_is_expenses_minus_refunds(
            expenses in proptest::collection::vec(0i64..10_000_000i64, 0..8),
            refunds in proptest::collection::vec(0i64..10_000_000i64, 0..8)
        ) {
            let expense_total: i64 = expenses.iter().sum();
            let refund_total: i64 = refunds.iter().sum();
            let record = record_with(expenses, refunds);

            let expected = Money::from_minor(expense_total, Currency::TND)
                - Money::from_minor(refund_total, Currency::TND);
            prop_assert_eq!(record.net_cost(), expected);
        }
    }
}
