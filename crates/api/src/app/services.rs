//! Service wiring (stores, token signer) and the record operations behind the routes.

use std::sync::Arc;

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::instrument;

use staffdir_auth::{
    Hs256Jwt, JwtValidator, LoginError, PasswordError, Role, Session, hash_password, login,
};
use staffdir_core::{DepartmentId, DomainError, Email, EmployeeId};
use staffdir_departments::{Department, DepartmentUpdate};
use staffdir_employees::{
    AddressUpdate, Employee, EmployeeError, EmployeeUpdate, NewAddress, NewEmployee,
};
use staffdir_infra::{
    AppConfig, BootstrapAdmin, DepartmentStore, EmployeeCredentials, EmployeeStore, StoreError,
    store::{
        InMemoryDepartmentStore, InMemoryEmployeeStore, PostgresDepartmentStore,
        PostgresEmployeeStore, ensure_schema,
    },
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("employee not found")]
    EmployeeNotFound,

    #[error("department not found")]
    DepartmentNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("employee already has an address")]
    AddressAlreadyExists,

    #[error("employee has no address")]
    NoAddress,

    #[error("email already in use")]
    EmailTaken,

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(format!("invalid id: {msg}")),
        }
    }
}

impl From<EmployeeError> for ServiceError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::Domain(e) => e.into(),
            EmployeeError::AddressAlreadyExists => ServiceError::AddressAlreadyExists,
            EmployeeError::NoAddress => ServiceError::NoAddress,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ServiceError::EmailTaken,
            StoreError::Backend(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Input of employee creation, already shape-checked by the HTTP layer.
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub department_id: DepartmentId,
}

/// Partial employee update; role and password are not changeable here.
#[derive(Debug, Clone, Default)]
pub struct ChangeEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<DepartmentId>,
}

pub struct AppServices {
    employees: Arc<dyn EmployeeStore>,
    departments: Arc<dyn DepartmentStore>,
    credentials: EmployeeCredentials<Arc<dyn EmployeeStore>>,
    jwt: Arc<Hs256Jwt>,
}

impl AppServices {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        departments: Arc<dyn DepartmentStore>,
        jwt: Arc<Hs256Jwt>,
    ) -> Self {
        Self {
            credentials: EmployeeCredentials::new(employees.clone()),
            employees,
            departments,
            jwt,
        }
    }

    pub fn in_memory(jwt: Arc<Hs256Jwt>) -> Self {
        Self::new(
            Arc::new(InMemoryEmployeeStore::new()),
            Arc::new(InMemoryDepartmentStore::new()),
            jwt,
        )
    }

    pub fn token_validator(&self) -> Arc<dyn JwtValidator> {
        self.jwt.clone()
    }

    // -------------------------
    // Auth
    // -------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        Ok(login(&self.credentials, self.jwt.as_ref(), email, password, Utc::now()).await?)
    }

    // -------------------------
    // Employees
    // -------------------------

    #[instrument(skip(self, input), fields(role = %input.role), err)]
    pub async fn create_employee(&self, input: CreateEmployee) -> Result<Employee, ServiceError> {
        let email = Email::parse(&input.email)?;
        self.require_department(input.department_id).await?;
        self.require_email_free(&email, None).await?;

        let password_hash = match input.password {
            Some(password) => Some(hash(password).await?),
            None => None,
        };

        let employee = Employee::create(
            NewEmployee {
                name: input.name,
                email,
                password_hash,
                role: input.role,
                department_id: input.department_id,
            },
            Utc::now(),
        )?;
        let saved = self.employees.save(&employee).await?;
        tracing::info!(employee_id = %saved.id, "employee created");
        Ok(saved)
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.employees.list().await?)
    }

    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee, ServiceError> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EmployeeNotFound)
    }

    #[instrument(skip(self, change), fields(employee_id = %id), err)]
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        change: ChangeEmployee,
    ) -> Result<Employee, ServiceError> {
        let mut employee = self.get_employee(id).await?;

        let email = change.email.as_deref().map(Email::parse).transpose()?;
        if let Some(email) = &email {
            self.require_email_free(email, Some(id)).await?;
        }
        if let Some(department_id) = change.department_id {
            self.require_department(department_id).await?;
        }

        employee.apply(
            EmployeeUpdate {
                name: change.name,
                email,
                department_id: change.department_id,
            },
            Utc::now(),
        )?;
        Ok(self.employees.save(&employee).await?)
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), ServiceError> {
        match self.employees.soft_delete(id, Utc::now()).await? {
            0 => Err(ServiceError::EmployeeNotFound),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self, address), fields(employee_id = %id), err)]
    pub async fn add_address(
        &self,
        id: EmployeeId,
        address: NewAddress,
    ) -> Result<Employee, ServiceError> {
        let mut employee = self.get_employee(id).await?;
        employee.add_address(address, Utc::now())?;
        Ok(self.employees.save(&employee).await?)
    }

    #[instrument(skip(self, update), fields(employee_id = %id), err)]
    pub async fn update_address(
        &self,
        id: EmployeeId,
        update: AddressUpdate,
    ) -> Result<Employee, ServiceError> {
        let mut employee = self.get_employee(id).await?;
        employee.update_address(update, Utc::now())?;
        Ok(self.employees.save(&employee).await?)
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    pub async fn remove_address(&self, id: EmployeeId) -> Result<Employee, ServiceError> {
        let mut employee = self.get_employee(id).await?;
        employee.remove_address(Utc::now())?;
        Ok(self.employees.save(&employee).await?)
    }

    async fn require_department(&self, id: DepartmentId) -> Result<(), ServiceError> {
        match self.departments.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::DepartmentNotFound),
        }
    }

    async fn require_email_free(
        &self,
        email: &Email,
        owner: Option<EmployeeId>,
    ) -> Result<(), ServiceError> {
        match self.employees.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(ServiceError::EmailTaken),
            _ => Ok(()),
        }
    }

    // -------------------------
    // Departments
    // -------------------------

    #[instrument(skip(self), err)]
    pub async fn create_department(&self, name: &str) -> Result<Department, ServiceError> {
        let department = Department::create(name, Utc::now())?;
        let saved = self.departments.save(&department).await?;
        tracing::info!(department_id = %saved.id, "department created");
        Ok(saved)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        Ok(self.departments.list().await?)
    }

    pub async fn get_department(&self, id: DepartmentId) -> Result<Department, ServiceError> {
        self.departments
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::DepartmentNotFound)
    }

    #[instrument(skip(self, update), fields(department_id = %id), err)]
    pub async fn update_department(
        &self,
        id: DepartmentId,
        update: DepartmentUpdate,
    ) -> Result<Department, ServiceError> {
        let mut department = self.get_department(id).await?;
        department.apply(update, Utc::now())?;
        Ok(self.departments.save(&department).await?)
    }

    #[instrument(skip(self), fields(department_id = %id), err)]
    pub async fn delete_department(&self, id: DepartmentId) -> Result<(), ServiceError> {
        match self.departments.soft_delete(id, Utc::now()).await? {
            0 => Err(ServiceError::DepartmentNotFound),
            _ => Ok(()),
        }
    }

    // -------------------------
    // Bootstrap
    // -------------------------

    /// Create the configured admin (and its department) unless the email is taken.
    pub async fn seed_admin(&self, admin: &BootstrapAdmin) -> Result<(), ServiceError> {
        let email = Email::parse(&admin.email)?;
        if self.employees.find_by_email(&email).await?.is_some() {
            tracing::info!("bootstrap admin already present");
            return Ok(());
        }

        let existing = self
            .departments
            .list()
            .await?
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(admin.department.trim()));
        let department = match existing {
            Some(d) => d,
            None => self.create_department(&admin.department).await?,
        };

        let employee = self
            .create_employee(CreateEmployee {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password: Some(admin.password.clone()),
                role: Role::Admin,
                department_id: department.id,
            })
            .await?;
        tracing::info!(employee_id = %employee.id, "bootstrap admin created");
        Ok(())
    }
}

/// bcrypt is CPU-bound; keep it off the async workers.
async fn hash(password: String) -> Result<String, ServiceError> {
    if password.is_empty() {
        return Err(ServiceError::Validation("password must not be empty".to_string()));
    }
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))??;
    Ok(hashed)
}

/// Wire stores and the token signer from configuration, then seed the bootstrap admin.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let jwt = Arc::new(Hs256Jwt::new(&config.jwt_secret, config.token_validity)?);

    let services = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            ensure_schema(&pool).await?;
            tracing::info!(store = "postgres", "stores ready");
            AppServices::new(
                Arc::new(PostgresEmployeeStore::new(pool.clone())),
                Arc::new(PostgresDepartmentStore::new(pool)),
                jwt,
            )
        }
        None => {
            tracing::info!(store = "in_memory", "stores ready");
            AppServices::in_memory(jwt)
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        services.seed_admin(admin).await?;
    }

    Ok(services)
}
