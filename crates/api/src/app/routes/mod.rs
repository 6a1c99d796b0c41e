use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod departments;
pub mod employees;
pub mod system;

/// Router for endpoints that need no token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/employee/login", post(auth::login))
}

/// Router for all bearer-authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/employee", employees::router())
        .nest("/department", departments::router())
}
