use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::dto::{self, CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_department).get(list_departments))
        .route(
            "/:id",
            get(get_department).put(update_department).delete(delete_department),
        )
}

pub async fn create_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::CREATE_DEPARTMENT, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services.create_department(&body.name).await {
        Ok(d) => (StatusCode::CREATED, Json(DepartmentResponse::from(&d))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_departments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::LIST_DEPARTMENTS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    match services.list_departments().await {
        Ok(items) => {
            let items = items.iter().map(DepartmentResponse::from).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::GET_DEPARTMENT, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let result = match dto::parse_department_id(&id) {
        Ok(id) => services.get_department(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(d) => (StatusCode::OK, Json(DepartmentResponse::from(&d))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDepartmentRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::UPDATE_DEPARTMENT, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }
    let body = match dto::json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let result = match dto::parse_department_id(&id) {
        Ok(id) => services.update_department(id, body.into()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(d) => (StatusCode::OK, Json(DepartmentResponse::from(&d))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::authorize_route(&authz::DELETE_DEPARTMENT, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let result = match dto::parse_department_id(&id) {
        Ok(id) => services.delete_department(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
