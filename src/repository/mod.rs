mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::EmployeeRecord;
use crate::schemas::{EmployeeUpdate, NewEmployee};

pub use memory::InMemoryEmployeeRepository;
pub use postgres::PgEmployeeRepository;

/// Persistence contract for the employee aggregate.
///
/// Every mutating operation is all-or-nothing: on error, no rows are left behind.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Look up an employee by its externally assigned business identifier.
    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Option<EmployeeRecord>, AppError>;

    /// Insert the employee and all of its contacts and addresses in one transaction.
    async fn create(&self, employee: &NewEmployee) -> Result<EmployeeRecord, AppError>;

    /// Page through employees in storage order.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRecord>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError>;

    /// Apply only the fields present in `patch`; children are never touched.
    async fn update(&self, existing: &EmployeeRecord, patch: &EmployeeUpdate) -> Result<EmployeeRecord, AppError>;

    /// Remove the employee and its children, returning the last known state.
    async fn delete(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError>;
}
