//! Credential lookup backed by the employee store.

use async_trait::async_trait;

use staffdir_auth::{CredentialStore, CredentialStoreError, Principal, PrincipalId};
use staffdir_core::Email;

use crate::store::{EmployeeStore, StoreError};

/// Exposes live employees as login principals.
#[derive(Debug, Clone)]
pub struct EmployeeCredentials<S> {
    employees: S,
}

impl<S> EmployeeCredentials<S> {
    pub fn new(employees: S) -> Self {
        Self { employees }
    }
}

impl From<StoreError> for CredentialStoreError {
    fn from(err: StoreError) -> Self {
        CredentialStoreError(err.to_string())
    }
}

#[async_trait]
impl<S> CredentialStore for EmployeeCredentials<S>
where
    S: EmployeeStore,
{
    async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, CredentialStoreError> {
        let employee = self.employees.find_by_email(email).await?;
        Ok(employee.map(|e| e.to_principal()))
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, CredentialStoreError> {
        let employee = self.employees.find_by_id(id.into()).await?;
        Ok(employee.map(|e| e.to_principal()))
    }
}
