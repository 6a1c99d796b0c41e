use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use staffdir_employees::Employee;

use crate::app::dto::{
    self, CreateAddressRequest, CreateEmployeeRequest, EmployeeResponse, UpdateAddressRequest,
    UpdateEmployeeRequest,
};
use crate::app::errors;
use crate::app::services::{AppServices, ServiceError};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_employee).get(list_employees))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route(
            "/:id/address",
            post(create_address).put(update_address).delete(delete_address),
        )
}

fn employee_response(status: StatusCode, result: Result<Employee, ServiceError>) -> axum::response::Response {
    match result {
        Ok(e) => (status, Json(EmployeeResponse::from(&e))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::CREATE_EMPLOYEE, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let result = match body.into_input() {
        Ok(input) => services.create_employee(input).await,
        Err(e) => Err(e),
    };
    employee_response(StatusCode::CREATED, result)
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::LIST_EMPLOYEES, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    match services.list_employees().await {
        Ok(items) => {
            let items = items.iter().map(EmployeeResponse::from).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::GET_EMPLOYEE, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let result = match dto::parse_employee_id(&id) {
        Ok(id) => services.get_employee(id).await,
        Err(e) => Err(e),
    };
    employee_response(StatusCode::OK, result)
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::UPDATE_EMPLOYEE, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let result = match (dto::parse_employee_id(&id), body.into_change()) {
        (Ok(id), Ok(change)) => services.update_employee(id, change).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    employee_response(StatusCode::OK, result)
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::DELETE_EMPLOYEE, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let result = match dto::parse_employee_id(&id) {
        Ok(id) => services.delete_employee(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<CreateAddressRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::CREATE_ADDRESS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let result = match dto::parse_employee_id(&id) {
        Ok(id) => services.add_address(id, body).await,
        Err(e) => Err(e),
    };
    employee_response(StatusCode::CREATED, result)
}

pub async fn update_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateAddressRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::UPDATE_ADDRESS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let result = match dto::parse_employee_id(&id) {
        Ok(id) => services.update_address(id, body).await,
        Err(e) => Err(e),
    };
    employee_response(StatusCode::OK, result)
}

pub async fn delete_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::DELETE_ADDRESS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let result = match dto::parse_employee_id(&id) {
        Ok(id) => services.remove_address(id).await,
        Err(e) => Err(e),
    };
    employee_response(StatusCode::OK, result)
}
