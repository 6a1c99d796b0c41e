//! Login: credential lookup → password check → token issuance.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use staffdir_core::Email;

use crate::{
    CredentialStore, CredentialStoreError, JwtIssuer, Principal, SigningError, verify_password,
};

/// Successful login: a signed token plus the principal it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub id_token: String,
    pub principal: Principal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// No such account. Does not reveal whether the email exists.
    #[error("not authorized")]
    NotAuthorized,

    #[error("incorrect username or password")]
    IncorrectCredentials,

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("password verification failed: {0}")]
    Verifier(String),

    #[error(transparent)]
    Store(#[from] CredentialStoreError),
}

#[instrument(skip_all)]
pub async fn login<S, I>(
    store: &S,
    issuer: &I,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Session, LoginError>
where
    S: CredentialStore + ?Sized,
    I: JwtIssuer + ?Sized,
{
    let Ok(email) = Email::parse(email) else {
        return Err(LoginError::NotAuthorized);
    };

    let Some(principal) = store.find_by_email(&email).await? else {
        tracing::debug!("login for unknown email");
        return Err(LoginError::NotAuthorized);
    };

    let password_ok = match principal.password_hash.clone() {
        Some(hash) => {
            // bcrypt is CPU-bound; keep it off the async workers.
            let password = password.to_string();
            tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| LoginError::Verifier(e.to_string()))?
        }
        None => false,
    };
    if !password_ok {
        tracing::debug!(principal = %principal.id, "login with wrong password");
        return Err(LoginError::IncorrectCredentials);
    }

    let id_token = issuer.issue_at(principal.id, &principal.name, principal.role, now)?;
    tracing::info!(principal = %principal.id, role = %principal.role, "login succeeded");

    Ok(Session { id_token, principal })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hs256Jwt, JwtValidator, PrincipalId, Role, hash_password};
    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    struct OneAccount(Principal);

    #[async_trait]
    impl CredentialStore for OneAccount {
        async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, CredentialStoreError> {
            Ok((self.0.email == *email).then(|| self.0.clone()))
        }

        async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, CredentialStoreError> {
            Ok((self.0.id == id).then(|| self.0.clone()))
        }
    }

    struct Unavailable;

    #[async_trait]
    impl CredentialStore for Unavailable {
        async fn find_by_email(&self, _email: &Email) -> Result<Option<Principal>, CredentialStoreError> {
            Err(CredentialStoreError("connection refused".to_string()))
        }

        async fn find_by_id(&self, _id: PrincipalId) -> Result<Option<Principal>, CredentialStoreError> {
            Err(CredentialStoreError("connection refused".to_string()))
        }
    }

    fn account(password_hash: Option<String>) -> OneAccount {
        OneAccount(Principal {
            id: PrincipalId::from_uuid(Uuid::now_v7()),
            name: "Alice".to_string(),
            email: Email::parse("a@x.com").unwrap(),
            password_hash,
            role: Role::Hr,
        })
    }

    fn jwt() -> Hs256Jwt {
        Hs256Jwt::new("login-test-secret", Duration::hours(1)).unwrap()
    }

    #[tokio::test]
    async fn login_issues_token_with_stored_role() {
        let store = account(Some(hash_password("secret").unwrap()));
        let jwt = jwt();
        let now = Utc::now();

        let session = login(&store, &jwt, "A@X.com", "secret", now).await.unwrap();
        let claims = jwt.validate(&session.id_token, now).unwrap();

        assert_eq!(claims.role, store.0.role);
        assert_eq!(claims.id, store.0.id);
        assert_eq!(claims.name, "Alice");
        assert_eq!(session.principal.id, store.0.id);
    }

    #[tokio::test]
    async fn unknown_email_is_not_authorized() {
        let store = account(Some(hash_password("secret").unwrap()));
        let err = login(&store, &jwt(), "b@x.com", "secret", Utc::now()).await.unwrap_err();
        assert_eq!(err, LoginError::NotAuthorized);

        let err = login(&store, &jwt(), "not an email", "secret", Utc::now()).await.unwrap_err();
        assert_eq!(err, LoginError::NotAuthorized);
    }

    #[tokio::test]
    async fn wrong_password_is_incorrect_credentials() {
        let store = account(Some(hash_password("secret").unwrap()));
        let err = login(&store, &jwt(), "a@x.com", "guess", Utc::now()).await.unwrap_err();
        assert_eq!(err, LoginError::IncorrectCredentials);
    }

    #[tokio::test]
    async fn account_without_password_cannot_log_in() {
        let store = account(None);
        let err = login(&store, &jwt(), "a@x.com", "", Utc::now()).await.unwrap_err();
        assert_eq!(err, LoginError::IncorrectCredentials);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn concurrent_logins_share_a_single_worker() {
        let store = account(Some(hash_password("secret").unwrap()));
        let jwt = jwt();
        let now = Utc::now();

        let (ok, bad) = tokio::join!(
            login(&store, &jwt, "a@x.com", "secret", now),
            login(&store, &jwt, "a@x.com", "guess", now),
        );
        assert!(ok.is_ok());
        assert_eq!(bad.unwrap_err(), LoginError::IncorrectCredentials);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let err = login(&Unavailable, &jwt(), "a@x.com", "secret", Utc::now()).await.unwrap_err();
        assert!(matches!(err, LoginError::Store(_)));
    }
}
