//! Signed bearer tokens (HS256).
//!
//! [`Hs256Jwt`] is both the issuer and the validator: it holds the server
//! secret read at startup and never changes afterwards.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{Claims, PrincipalId, Role, validate_claims};

/// Longest accepted token lifetime, in seconds (365 days).
pub const MAX_TOKEN_VALIDITY_SECS: i64 = 365 * 24 * 60 * 60;

/// Issuing failed. Fatal configuration problem: no token is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("token validity must be positive and at most 365 days")]
    InvalidValidity,

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("failed to sign token: {0}")]
    Encode(String),
}

/// Token verification failed.
///
/// There is deliberately one variant: callers never learn whether the
/// signature, the shape or the expiry was wrong.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,
}

pub trait JwtIssuer: Send + Sync {
    fn issue_at(
        &self,
        id: PrincipalId,
        name: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError>;

    fn issue(&self, id: PrincipalId, name: &str, role: Role) -> Result<String, SigningError> {
        self.issue_at(id, name, role, Utc::now())
    }
}

pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate(token, Utc::now())
    }
}

#[derive(Clone)]
pub struct Hs256Jwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>, validity: Duration) -> Result<Self, SigningError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }
        if validity <= Duration::zero() || validity > Duration::seconds(MAX_TOKEN_VALIDITY_SECS) {
            return Err(SigningError::InvalidValidity);
        }
        if secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // The time window is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            validity,
        })
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer for Hs256Jwt {
    fn issue_at(
        &self,
        id: PrincipalId,
        name: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let iat = now.trunc_subsecs(0);
        let claims = Claims {
            id,
            name: name.to_string(),
            role,
            iat,
            exp: iat
                .checked_add_signed(self.validity)
                .ok_or(SigningError::ExpiryOutOfRange)?,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SigningError::Encode(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                TokenError::InvalidToken
            })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(error = %e, principal = %data.claims.id, "token rejected");
            TokenError::InvalidToken
        })?;

        Ok(data.claims)
    }
}
