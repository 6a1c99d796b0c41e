use std::str::FromStr;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffdir_auth::{Principal, Role};
use staffdir_core::{DepartmentId, EmployeeId};
use staffdir_departments::{Department, DepartmentUpdate};
use staffdir_employees::{Address, AddressUpdate, Employee, NewAddress};

use crate::app::errors;
use crate::app::services::{ChangeEmployee, CreateEmployee, ServiceError};

/// Unwrap a JSON body, mapping a rejection to the API error shape.
///
/// Handlers take the body as a `Result` so the access check runs first.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            errors::VALIDATION_ERROR,
            rejection.body_text(),
        )
    })
}

pub fn parse_employee_id(raw: &str) -> Result<EmployeeId, ServiceError> {
    Ok(EmployeeId::from_str(raw)?)
}

pub fn parse_department_id(raw: &str) -> Result<DepartmentId, ServiceError> {
    Ok(DepartmentId::from_str(raw)?)
}

fn parse_role(raw: &str) -> Result<Role, ServiceError> {
    Role::from_str(raw).map_err(|e| ServiceError::Validation(e.to_string()))
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: String,
    pub department_id: String,
}

impl CreateEmployeeRequest {
    pub fn into_input(self) -> Result<CreateEmployee, ServiceError> {
        Ok(CreateEmployee {
            role: parse_role(&self.role)?,
            department_id: parse_department_id(&self.department_id)?,
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn into_change(self) -> Result<ChangeEmployee, ServiceError> {
        Ok(ChangeEmployee {
            department_id: self.department_id.as_deref().map(parse_department_id).transpose()?,
            name: self.name,
            email: self.email,
        })
    }
}

pub type CreateAddressRequest = NewAddress;
pub type UpdateAddressRequest = AddressUpdate;

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
}

impl From<UpdateDepartmentRequest> for DepartmentUpdate {
    fn from(req: UpdateDepartmentRequest) -> Self {
        DepartmentUpdate { name: req.name }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Address> for AddressResponse {
    fn from(a: &Address) -> Self {
        Self {
            id: a.id.to_string(),
            address: a.address.clone(),
            city: a.city.clone(),
            district: a.district.clone(),
            state: a.state.clone(),
            country: a.country.clone(),
            created_at: a.meta.created_at,
            updated_at: a.meta.updated_at,
        }
    }
}

/// Employee as returned over HTTP. Never includes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: String,
    pub address: Option<AddressResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            email: e.email.to_string(),
            role: e.role,
            department_id: e.department_id.to_string(),
            address: e.address.as_ref().map(AddressResponse::from),
            created_at: e.meta.created_at,
            updated_at: e.meta.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&Principal> for PrincipalResponse {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            email: p.email.to_string(),
            role: p.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id_token: String,
    pub employee_details: PrincipalResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Department> for DepartmentResponse {
    fn from(d: &Department) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            created_at: d.meta.created_at,
            updated_at: d.meta.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffdir_core::Email;
    use staffdir_employees::NewEmployee;

    #[test]
    fn employee_response_hides_password_hash() {
        let employee = Employee::create(
            NewEmployee {
                name: "Ada".to_string(),
                email: Email::parse("ada@example.com").unwrap(),
                password_hash: Some("$2b$10$secret".to_string()),
                role: Role::Manager,
                department_id: DepartmentId::new(),
            },
            Utc::now(),
        )
        .unwrap();

        let json = serde_json::to_value(EmployeeResponse::from(&employee)).unwrap();
        assert_eq!(json["role"], "manager");
        assert!(json.get("departmentId").is_some());
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let req = CreateEmployeeRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: None,
            role: "ceo".to_string(),
            department_id: DepartmentId::new().to_string(),
        };
        assert!(matches!(req.into_input(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        assert!(matches!(parse_employee_id("42"), Err(ServiceError::Validation(_))));
    }
}
