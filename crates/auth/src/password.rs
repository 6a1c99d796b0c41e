//! Password hashing and verification (bcrypt).

use thiserror::Error;

/// bcrypt work factor. Fixed so every stored hash has the same cost.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plaintext, HASH_COST).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// A malformed hash never verifies; it is reported as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match bcrypt::verify(plaintext, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "stored password hash is not a valid bcrypt hash");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_verifies_only_its_password() {
        let hash = hash_password("secret").unwrap();

        assert!(hash.starts_with("$2b$10$"));
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("secret", ""));
        assert!(!verify_password("secret", "not-a-hash"));
        assert!(!verify_password("secret", "$2b$10$tooshort"));
    }

    proptest! {
        // bcrypt is deliberately slow; a handful of cases is enough.
        #![proptest_config(ProptestConfig::with_cases(6))]

        #[test]
        fn round_trip_and_mismatch(password in "[a-zA-Z0-9!@#]{1,32}", other in "[a-zA-Z0-9!@#]{1,32}") {
            let hash = hash_password(&password).unwrap();
            prop_assert!(verify_password(&password, &hash));
            if other != password {
                prop_assert!(!verify_password(&other, &hash));
            }
        }
    }
}
