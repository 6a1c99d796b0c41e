use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto::{self, LoginRequest, LoginResponse, PrincipalResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services.login(&body.email, &body.password).await {
        Ok(session) => (
            StatusCode::OK,
            Json(LoginResponse {
                id_token: session.id_token,
                employee_details: PrincipalResponse::from(&session.principal),
            }),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
