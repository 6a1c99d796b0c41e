use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffdir_core::{AddressId, DomainError, DomainResult, Entity, Record, RecordMeta};

/// Postal address owned by exactly one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub meta: RecordMeta,
}

/// All fields required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

fn required(field: &str, value: String) -> DomainResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

impl Address {
    pub fn create(new: NewAddress, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: AddressId::new(),
            address: required("address", new.address)?,
            city: required("city", new.city)?,
            district: required("district", new.district)?,
            state: required("state", new.state)?,
            country: required("country", new.country)?,
            meta: RecordMeta::new(now),
        })
    }

    /// Validates every provided field before changing any of them.
    pub fn apply(&mut self, update: AddressUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        let address = update.address.map(|v| required("address", v)).transpose()?;
        let city = update.city.map(|v| required("city", v)).transpose()?;
        let district = update.district.map(|v| required("district", v)).transpose()?;
        let state = update.state.map(|v| required("state", v)).transpose()?;
        let country = update.country.map(|v| required("country", v)).transpose()?;

        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = city {
            self.city = v;
        }
        if let Some(v) = district {
            self.district = v;
        }
        if let Some(v) = state {
            self.state = v;
        }
        if let Some(v) = country {
            self.country = v;
        }
        self.meta.touch(now);
        Ok(())
    }
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Address {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}
