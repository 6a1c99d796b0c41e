use staffdir_auth::Claims;

/// Verified caller of a request, inserted by the auth middleware.
///
/// Reflects the token as issued; it is not re-read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    claims: Claims,
}

impl PrincipalContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
