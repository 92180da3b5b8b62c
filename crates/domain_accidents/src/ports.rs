//! Accidents Domain Ports
//!
//! Port interface for accident persistence, including the expense and
//! refund sub-resources. Adapters implement it against the REST gateway;
//! the in-memory mock backs the test suite and can be armed to fail the
//! next create, which is how the non-atomic submission gap is exercised.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccidentId, AgencyId, CarId, Currency, DomainPort, ExpenseId, Money, PortError, RefundId,
    ReservationId,
};

use crate::accident::{AccidentRecord, AccidentStatus, Expense, Refund};

/// Payload for declaring an accident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccident {
    pub agency_id: AgencyId,
    pub car_id: CarId,
    pub reservation_id: Option<ReservationId>,
    pub accident_date: DateTime<Utc>,
    pub notes: String,
    pub expert_full_name: Option<String>,
    pub expert_phone: Option<String>,
    pub currency: Currency,
}

/// Partial update of an accident file; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccidentUpdate {
    pub notes: Option<String>,
    pub expert_full_name: Option<String>,
    pub expert_phone: Option<String>,
    pub status: Option<AccidentStatus>,
}

/// Accident persistence operations
#[async_trait]
pub trait AccidentService: DomainPort {
    /// Persists a new accident record
    async fn create(&self, new: NewAccident) -> Result<AccidentRecord, PortError>;

    /// Applies a partial update
    async fn update(&self, id: AccidentId, update: AccidentUpdate)
        -> Result<AccidentRecord, PortError>;

    /// Fetches one record
    async fn get_by_id(&self, id: AccidentId) -> Result<AccidentRecord, PortError>;

    /// All accidents of an agency
    async fn get_by_agency(&self, agency_id: AgencyId) -> Result<Vec<AccidentRecord>, PortError>;

    /// Deletes a record
    async fn delete(&self, id: AccidentId) -> Result<(), PortError>;

    /// Attaches an expense
    async fn add_expense(
        &self,
        id: AccidentId,
        name: String,
        amount: Money,
        file_path: Option<String>,
    ) -> Result<Expense, PortError>;

    /// Removes an expense
    async fn delete_expense(&self, id: AccidentId, expense_id: ExpenseId)
        -> Result<(), PortError>;

    /// Attaches a refund
    async fn add_refund(
        &self,
        id: AccidentId,
        name: String,
        amount: Money,
        file_path: Option<String>,
    ) -> Result<Refund, PortError>;

    /// Removes a refund
    async fn delete_refund(&self, id: AccidentId, refund_id: RefundId) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of the accident service
    #[derive(Debug, Default)]
    pub struct InMemoryAccidents {
        records: Arc<RwLock<Vec<AccidentRecord>>>,
        create_calls: Arc<RwLock<Vec<NewAccident>>>,
        fail_next_create: AtomicBool,
    }

    impl InMemoryAccidents {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Arms a one-shot failure for the next create call
        pub fn fail_next_create(&self) {
            self.fail_next_create.store(true, Ordering::SeqCst);
        }

        /// Create payloads received so far, including failed attempts
        pub async fn create_calls(&self) -> Vec<NewAccident> {
            self.create_calls.read().await.clone()
        }
    }

    impl DomainPort for InMemoryAccidents {}

    #[async_trait]
    impl AccidentService for InMemoryAccidents {
        async fn create(&self, new: NewAccident) -> Result<AccidentRecord, PortError> {
            self.create_calls.write().await.push(new.clone());
            if self.fail_next_create.swap(false, Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "accidents".to_string(),
                });
            }

            let record = AccidentRecord::register(new);
            self.records.write().await.push(record.clone());
            Ok(record)
        }

        async fn update(
            &self,
            id: AccidentId,
            update: AccidentUpdate,
        ) -> Result<AccidentRecord, PortError> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;

            if let Some(notes) = update.notes {
                record.notes = notes;
            }
            if let Some(name) = update.expert_full_name {
                record.expert_full_name = Some(name);
            }
            if let Some(phone) = update.expert_phone {
                record.expert_phone = Some(phone);
            }
            if let Some(status) = update.status {
                record
                    .update_status(status)
                    .map_err(|e| PortError::conflict(e.to_string()))?;
            }
            record.updated_at = Utc::now();
            Ok(record.clone())
        }

        async fn get_by_id(&self, id: AccidentId) -> Result<AccidentRecord, PortError> {
            self.records
                .read()
                .await
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Accident", id))
        }

        async fn get_by_agency(
            &self,
            agency_id: AgencyId,
        ) -> Result<Vec<AccidentRecord>, PortError> {
            Ok(self
                .records
                .read()
                .await
                .iter()
                .filter(|r| r.agency_id == agency_id)
                .cloned()
                .collect())
        }

        async fn delete(&self, id: AccidentId) -> Result<(), PortError> {
            let mut records = self.records.write().await;
            let position = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;
            records.remove(position);
            Ok(())
        }

        async fn add_expense(
            &self,
            id: AccidentId,
            name: String,
            amount: Money,
            file_path: Option<String>,
        ) -> Result<Expense, PortError> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;

            record
                .add_expense(name, amount, file_path)
                .map_err(|e| PortError::validation(e.to_string()))
        }

        async fn delete_expense(
            &self,
            id: AccidentId,
            expense_id: ExpenseId,
        ) -> Result<(), PortError> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;

            record
                .remove_expense(expense_id)
                .map(|_| ())
                .map_err(|_| PortError::not_found("Expense", expense_id))
        }

        async fn add_refund(
            &self,
            id: AccidentId,
            name: String,
            amount: Money,
            file_path: Option<String>,
        ) -> Result<Refund, PortError> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;

            record
                .add_refund(name, amount, file_path)
                .map_err(|e| PortError::validation(e.to_string()))
        }

        async fn delete_refund(
            &self,
            id: AccidentId,
            refund_id: RefundId,
        ) -> Result<(), PortError> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| PortError::not_found("Accident", id))?;

            record
                .remove_refund(refund_id)
                .map(|_| ())
                .map_err(|_| PortError::not_found("Refund", refund_id))
        }
    }
}
