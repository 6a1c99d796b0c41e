//! Employee record: the login principal of the system.
//!
//! # Invariants
//! - The email is normalized (see [`Email`]); uniqueness is enforced by the store.
//! - The role is always one of [`Role`].
//! - At most one live address; removing it tombstones it.
//! - Role and password hash are only set at creation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use staffdir_auth::{Principal, Role};
use staffdir_core::{DepartmentId, DomainError, Email, EmployeeId, Entity, Record, RecordMeta};

use crate::{Address, AddressUpdate, NewAddress};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("employee already has an address")]
    AddressAlreadyExists,

    #[error("employee has no address")]
    NoAddress,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: Email,
    pub password_hash: Option<String>,
    pub role: Role,
    pub department_id: DepartmentId,
    pub address: Option<Address>,
    pub meta: RecordMeta,
}

impl core::fmt::Debug for Employee {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Employee")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("has_password", &self.password_hash.is_some())
            .field("role", &self.role)
            .field("department_id", &self.department_id)
            .field("address", &self.address)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Data for a new employee. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: Email,
    pub password_hash: Option<String>,
    pub role: Role,
    pub department_id: DepartmentId,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub department_id: Option<DepartmentId>,
}

fn validate_name(name: String) -> Result<String, DomainError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    Ok(name)
}

impl Employee {
    pub fn create(new: NewEmployee, now: DateTime<Utc>) -> Result<Self, EmployeeError> {
        Ok(Self {
            id: EmployeeId::new(),
            name: validate_name(new.name)?,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            department_id: new.department_id,
            address: None,
            meta: RecordMeta::new(now),
        })
    }

    pub fn apply(&mut self, update: EmployeeUpdate, now: DateTime<Utc>) -> Result<(), EmployeeError> {
        let name = update.name.map(validate_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(department_id) = update.department_id {
            self.department_id = department_id;
        }
        self.meta.touch(now);
        Ok(())
    }

    pub fn add_address(&mut self, new: NewAddress, now: DateTime<Utc>) -> Result<&Address, EmployeeError> {
        if self.address.is_some() {
            return Err(EmployeeError::AddressAlreadyExists);
        }
        let address = Address::create(new, now)?;
        self.meta.touch(now);
        Ok(self.address.insert(address))
    }

    pub fn update_address(
        &mut self,
        update: AddressUpdate,
        now: DateTime<Utc>,
    ) -> Result<&Address, EmployeeError> {
        let address = self.address.as_mut().ok_or(EmployeeError::NoAddress)?;
        address.apply(update, now)?;
        self.meta.touch(now);
        Ok(address)
    }

    /// Detach the address and return it tombstoned.
    pub fn remove_address(&mut self, now: DateTime<Utc>) -> Result<Address, EmployeeError> {
        let mut address = self.address.take().ok_or(EmployeeError::NoAddress)?;
        address.soft_delete(now);
        self.meta.touch(now);
        Ok(address)
    }

    /// Credential snapshot used by login.
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id.into(),
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
        }
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Employee {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}
