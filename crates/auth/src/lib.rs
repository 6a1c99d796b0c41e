//! Authentication and authorization boundary.
//!
//! Credential verification, token issuance/verification and role-gated access.
//! No HTTP or storage code lives here: persistence is
//! reached only through the [`CredentialStore`] trait.

pub mod authorize;
pub mod claims;
pub mod login;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{authorize, AccessDecision, AccessPolicy, AuthzError};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use login::{login, LoginError, Session};
pub use password::{hash_password, verify_password, PasswordError, HASH_COST};
pub use principal::{CredentialStore, CredentialStoreError, Principal, PrincipalId};
pub use roles::{Role, UnknownRole};
pub use token::{Hs256Jwt, JwtIssuer, JwtValidator, MAX_TOKEN_VALIDITY_SECS, SigningError, TokenError};
