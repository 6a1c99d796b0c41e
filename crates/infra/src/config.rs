//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use staffdir_auth::MAX_TOKEN_VALIDITY_SECS;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Admin account seeded at startup when its email is not taken yet.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
    pub department: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("department", &self.department)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_validity: Duration,
    /// `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_validity", &self.token_validity)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_TOKEN_SECRET").ok_or(ConfigError::Missing("JWT_TOKEN_SECRET"))?;

        let token_validity = match get("ID_TOKEN_VALIDITY") {
            Some(raw) => parse_validity(&raw).map_err(|reason| ConfigError::Invalid {
                key: "ID_TOKEN_VALIDITY",
                reason,
            })?,
            None => Duration::seconds(DEFAULT_TOKEN_VALIDITY_SECS),
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let bootstrap_admin = match (get("BOOTSTRAP_ADMIN_EMAIL"), get("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: get("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                department: get("BOOTSTRAP_ADMIN_DEPARTMENT")
                    .unwrap_or_else(|| "Administration".to_string()),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_EMAIL")),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_validity,
            database_url: get("DATABASE_URL"),
            bootstrap_admin,
        })
    }
}

/// Parse a token lifetime: plain seconds or `<n>` followed by `s`, `m`, `h` or `d`.
pub fn parse_validity(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };

    let n: i64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("expected a number of seconds or <n>s/m/h/d, got {raw:?}"))?;
    if n <= 0 {
        return Err("validity must be positive".to_string());
    }

    let secs = match unit {
        's' => Some(n),
        'm' => n.checked_mul(60),
        'h' => n.checked_mul(60 * 60),
        'd' => n.checked_mul(24 * 60 * 60),
        other => return Err(format!("unknown unit {other:?}")),
    };
    match secs {
        Some(secs) if secs <= MAX_TOKEN_VALIDITY_SECS => Ok(Duration::seconds(secs)),
        _ => Err(format!("validity must not exceed {MAX_TOKEN_VALIDITY_SECS} seconds")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_TOKEN_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.token_validity, Duration::hours(1));
        assert!(config.database_url.is_none());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn secret_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_TOKEN_SECRET"));

        let err = AppConfig::from_lookup(lookup(&[("JWT_TOKEN_SECRET", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_TOKEN_SECRET"));
    }

    #[test]
    fn validity_units() {
        assert_eq!(parse_validity("90").unwrap(), Duration::seconds(90));
        assert_eq!(parse_validity("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_validity("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_validity("2H").unwrap(), Duration::hours(2));
        assert_eq!(parse_validity("7d").unwrap(), Duration::days(7));

        assert!(parse_validity("0").is_err());
        assert!(parse_validity("-5m").is_err());
        assert!(parse_validity("10w").is_err());
        assert!(parse_validity("soon").is_err());
    }

    #[test]
    fn validity_has_a_ceiling() {
        assert_eq!(parse_validity("365d").unwrap(), Duration::days(365));
        assert!(parse_validity("366d").is_err());
        assert!(parse_validity("10000000000000").is_err());
        assert!(parse_validity("9223372036854775807d").is_err());

        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_TOKEN_SECRET", "s3cret"),
            ("ID_TOKEN_VALIDITY", "10000000000000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ID_TOKEN_VALIDITY", .. }));
    }

    #[test]
    fn bootstrap_admin_needs_email_and_password() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_TOKEN_SECRET", "s3cret"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "changeme"),
        ]))
        .unwrap();
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.name, "Administrator");
        assert_eq!(admin.department, "Administration");

        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_TOKEN_SECRET", "s3cret"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_TOKEN_SECRET", "top-secret-value"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret-value"));
        assert!(!rendered.contains("hunter2"));
    }
}
