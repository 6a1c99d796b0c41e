//! Infrastructure layer: configuration, record stores, credential lookup.

pub mod config;
pub mod credentials;
pub mod store;

pub use config::{AppConfig, BootstrapAdmin, ConfigError};
pub use credentials::EmployeeCredentials;
pub use store::{DepartmentStore, EmployeeStore, StoreError, StoreResult};
