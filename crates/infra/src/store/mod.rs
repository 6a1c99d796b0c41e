//! Record stores for employees and departments.
//!
//! Every read excludes tombstoned records. `save` is an upsert: the last
//! writer wins, there is no version check.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use staffdir_core::{DepartmentId, Email, EmployeeId};
use staffdir_departments::Department;
use staffdir_employees::Employee;

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryDepartmentStore, InMemoryEmployeeStore, InMemoryRecordStore};
pub use postgres::{PostgresDepartmentStore, PostgresEmployeeStore, ensure_schema};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Employee>>;
    async fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>>;
    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Employee>>;
    /// Insert or replace. A live email used by another employee is a `Conflict`.
    async fn save(&self, employee: &Employee) -> StoreResult<Employee>;
    /// Tombstone; returns the number of records affected (0 or 1).
    async fn soft_delete(&self, id: EmployeeId, at: DateTime<Utc>) -> StoreResult<u64>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Department>>;
    async fn find_by_id(&self, id: DepartmentId) -> StoreResult<Option<Department>>;
    async fn save(&self, department: &Department) -> StoreResult<Department>;
    async fn soft_delete(&self, id: DepartmentId, at: DateTime<Utc>) -> StoreResult<u64>;
}

#[async_trait]
impl<S> EmployeeStore for Arc<S>
where
    S: EmployeeStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        (**self).list().await
    }

    async fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Employee>> {
        (**self).find_by_email(email).await
    }

    async fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        (**self).save(employee).await
    }

    async fn soft_delete(&self, id: EmployeeId, at: DateTime<Utc>) -> StoreResult<u64> {
        (**self).soft_delete(id, at).await
    }
}

#[async_trait]
impl<S> DepartmentStore for Arc<S>
where
    S: DepartmentStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Department>> {
        (**self).list().await
    }

    async fn find_by_id(&self, id: DepartmentId) -> StoreResult<Option<Department>> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, department: &Department) -> StoreResult<Department> {
        (**self).save(department).await
    }

    async fn soft_delete(&self, id: DepartmentId, at: DateTime<Utc>) -> StoreResult<u64> {
        (**self).soft_delete(id, at).await
    }
}
