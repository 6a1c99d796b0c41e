use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::errors;
use crate::authz;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::WHOAMI, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let claims = principal.claims();
    Json(serde_json::json!({
        "id": claims.id.to_string(),
        "name": claims.name,
        "role": claims.role,
        "iat": claims.iat.timestamp(),
        "exp": claims.exp.timestamp(),
    }))
    .into_response()
}
