use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use staffdir_auth::{AuthzError, LoginError};

use crate::app::services::ServiceError;

pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const INCORRECT_USERNAME_OR_PASSWORD: &str = "INCORRECT_USERNAME_OR_PASSWORD";
pub const USER_WITH_ID_NOT_FOUND: &str = "USER_WITH_ID_NOT_FOUND";
pub const DEPARTMENT_WITH_ID_NOT_FOUND: &str = "DEPARTMENT_WITH_ID_NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const ADDRESS_ALREADY_EXISTS: &str = "ADDRESS_ALREADY_EXISTS";
pub const NO_ADDRESS: &str = "NO_ADDRESS";
pub const EMAIL_ALREADY_EXISTS: &str = "EMAIL_ALREADY_EXISTS";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// The single denial body for every authentication or authorization failure.
pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED, "not authorized")
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    tracing::debug!(reason = %err, "request denied");
    unauthorized()
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::EmployeeNotFound => {
            json_error(StatusCode::NOT_FOUND, USER_WITH_ID_NOT_FOUND, "employee not found")
        }
        ServiceError::DepartmentNotFound => json_error(
            StatusCode::NOT_FOUND,
            DEPARTMENT_WITH_ID_NOT_FOUND,
            "department not found",
        ),
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, VALIDATION_ERROR, msg),
        ServiceError::AddressAlreadyExists => json_error(
            StatusCode::BAD_REQUEST,
            ADDRESS_ALREADY_EXISTS,
            "employee already has an address",
        ),
        ServiceError::NoAddress => {
            json_error(StatusCode::BAD_REQUEST, NO_ADDRESS, "employee has no address")
        }
        ServiceError::EmailTaken => json_error(
            StatusCode::CONFLICT,
            EMAIL_ALREADY_EXISTS,
            "an employee with this email already exists",
        ),
        ServiceError::Login(err) => login_error_to_response(err),
        ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "request failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                "internal server error",
            )
        }
    }
}

fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::NotAuthorized => unauthorized(),
        LoginError::IncorrectCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            INCORRECT_USERNAME_OR_PASSWORD,
            "incorrect username or password",
        ),
        LoginError::Signing(e) => service_error_to_response(ServiceError::Internal(e.to_string())),
        LoginError::Store(e) => service_error_to_response(ServiceError::Internal(e.to_string())),
        LoginError::Verifier(e) => service_error_to_response(ServiceError::Internal(e)),
    }
}
