//! Record foundation building blocks shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod email;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use email::Email;
pub use entity::{Entity, Record, RecordMeta};
pub use error::{DomainError, DomainResult};
pub use id::{AddressId, DepartmentId, EmployeeId};
pub use value_object::ValueObject;
