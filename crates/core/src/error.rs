//! Errors raised while building or changing records.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected input at the record level. Lookups and storage failures are
/// reported by the layers that perform them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field value was rejected (blank name, malformed email).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Text that should name a record did not parse as its id type.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = DomainError::validation("name must not be empty");
        assert_eq!(err.to_string(), "validation failed: name must not be empty");

        let err = DomainError::invalid_id("EmployeeId: bad");
        assert!(matches!(err, DomainError::InvalidId(_)));
    }
}
