//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two values with the same attributes
/// are the same value. They are immutable; to "modify" one, build a new one.
///
/// - **Value Object**: `Email("a@x.com")`
/// - **Entity**: `Employee { id: EmployeeId(...), .. }`
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
