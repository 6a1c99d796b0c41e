use thiserror::Error;

use crate::{Claims, Role};

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        self == AccessDecision::Allow
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no verified principal")]
    Unauthenticated,

    #[error("forbidden: role '{role}' is not permitted to {operation}")]
    Forbidden { operation: &'static str, role: Role },
}

/// Decide access from verified claims and a permitted-role set.
///
/// - No IO
/// - No panics
/// - Pure set membership (no role implies another)
pub fn authorize(claims: Option<&Claims>, permitted: &[Role]) -> AccessDecision {
    match claims {
        Some(claims) if permitted.contains(&claims.role) => AccessDecision::Allow,
        _ => AccessDecision::Deny,
    }
}

/// Statically declared permitted-role set of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    operation: &'static str,
    permitted: &'static [Role],
}

impl AccessPolicy {
    pub const fn new(operation: &'static str, permitted: &'static [Role]) -> Self {
        Self { operation, permitted }
    }

    pub fn check(&self, claims: Option<&Claims>) -> AccessDecision {
        authorize(claims, self.permitted)
    }

    /// Like [`AccessPolicy::check`], with the denial reason for logging.
    pub fn enforce(&self, claims: Option<&Claims>) -> Result<(), AuthzError> {
        match (self.check(claims), claims) {
            (AccessDecision::Allow, _) => Ok(()),
            (AccessDecision::Deny, None) => Err(AuthzError::Unauthenticated),
            (AccessDecision::Deny, Some(claims)) => Err(AuthzError::Forbidden {
                operation: self.operation,
                role: claims.role,
            }),
        }
    }
}
