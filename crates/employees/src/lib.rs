//! Employees domain module (employee records and their addresses).
//!
//! This crate contains the record rules for employees, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod address;
pub mod employee;

pub use address::{Address, AddressUpdate, NewAddress};
pub use employee::{Employee, EmployeeError, EmployeeUpdate, NewEmployee};
