use core::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use staffdir_core::{Email, EmployeeId};

use crate::Role;

/// Identity of an authenticated principal (an employee account).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<EmployeeId> for PrincipalId {
    fn from(value: EmployeeId) -> Self {
        Self(*value.as_uuid())
    }
}

impl From<PrincipalId> for EmployeeId {
    fn from(value: PrincipalId) -> Self {
        EmployeeId::from_uuid(value.0)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Credential snapshot of an authenticable account, as held by the store.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub name: String,
    pub email: Email,
    /// `None` for accounts that cannot log in.
    pub password_hash: Option<String>,
    pub role: Role,
}

impl core::fmt::Debug for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("credential store unavailable: {0}")]
pub struct CredentialStoreError(pub String);

/// Read access to stored credentials.
///
/// Implementations must only return live (non-tombstoned) accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, CredentialStoreError>;
    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, CredentialStoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, CredentialStoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, CredentialStoreError> {
        (**self).find_by_id(id).await
    }
}
