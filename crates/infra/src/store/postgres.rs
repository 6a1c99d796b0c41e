//! Postgres-backed record stores.
//!
//! ## Error Mapping
//!
//! | PostgreSQL Error Code | StoreError | Scenario |
//! |-----------------------|------------|----------|
//! | `23505` | `Conflict` | Live email already used (partial unique index) |
//! | any other / non-database | `Backend` | Connection, pool, decoding failures |
//!
//! Soft-deleted rows are never returned: every read filters on `deleted_at IS NULL`.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use staffdir_auth::Role;
use staffdir_core::{AddressId, DepartmentId, Email, EmployeeId, RecordMeta};
use staffdir_departments::Department;
use staffdir_employees::{Address, Employee};

use super::{DepartmentStore, EmployeeStore, StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS department (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS address (
    id          UUID PRIMARY KEY,
    address     TEXT NOT NULL,
    city        TEXT NOT NULL,
    district    TEXT NOT NULL,
    state       TEXT NOT NULL,
    country     TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS employee (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    password_hash   TEXT,
    role            TEXT NOT NULL CHECK (role IN ('admin', 'hr', 'manager', 'engineer')),
    department_id   UUID NOT NULL REFERENCES department (id),
    address_id      UUID REFERENCES address (id),
    created_at      TIMESTAMPTZ NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL,
    deleted_at      TIMESTAMPTZ
);

CREATE UNIQUE INDEX IF NOT EXISTS employee_live_email
    ON employee (email) WHERE deleted_at IS NULL;
"#;

/// Create tables and indexes if they do not exist yet.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

const EMPLOYEE_SELECT: &str = r#"
    SELECT
        e.id, e.name, e.email, e.password_hash, e.role, e.department_id,
        e.created_at, e.updated_at, e.deleted_at,
        a.id AS a_id, a.address AS a_address, a.city AS a_city, a.district AS a_district,
        a.state AS a_state, a.country AS a_country,
        a.created_at AS a_created_at, a.updated_at AS a_updated_at
    FROM employee e
    LEFT JOIN address a ON a.id = e.address_id AND a.deleted_at IS NULL
    WHERE e.deleted_at IS NULL
"#;

#[derive(Debug, Clone)]
pub struct PostgresEmployeeStore {
    pool: Arc<PgPool>,
}

impl PostgresEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl EmployeeStore for PostgresEmployeeStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("{EMPLOYEE_SELECT} ORDER BY e.created_at ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_employees", e))?;
        rows.iter().map(employee_from_row).collect()
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    async fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        let sql = format!("{EMPLOYEE_SELECT} AND e.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_employee_by_id", e))?;
        row.as_ref().map(employee_from_row).transpose()
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Employee>> {
        let sql = format!("{EMPLOYEE_SELECT} AND e.email = $1");
        let row = sqlx::query(&sql)
            .bind(email.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_employee_by_email", e))?;
        row.as_ref().map(employee_from_row).transpose()
    }

    /// Upserts the employee and its address in one transaction.
    ///
    /// A previously linked address that is no longer attached is tombstoned.
    #[instrument(skip(self, employee), fields(employee_id = %employee.id), err)]
    async fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_save_employee", e))?;

        let previous: Option<Uuid> =
            sqlx::query("SELECT address_id FROM employee WHERE id = $1 FOR UPDATE")
                .bind(employee.id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("lock_employee", e))?
                .map(|row| row.try_get::<Option<Uuid>, _>("address_id"))
                .transpose()
                .map_err(|e| map_sqlx_error("lock_employee", e))?
                .flatten();

        let current = employee.address.as_ref().map(|a| *a.id.as_uuid());
        if let Some(address) = &employee.address {
            upsert_address(&mut tx, address).await?;
        }
        if let Some(old) = previous.filter(|old| Some(*old) != current) {
            sqlx::query("UPDATE address SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(old)
                .bind(employee.meta.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("tombstone_address", e))?;
        }

        sqlx::query(
            r#"
            INSERT INTO employee (
                id, name, email, password_hash, role, department_id, address_id,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                department_id = EXCLUDED.department_id,
                address_id = EXCLUDED.address_id,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(&employee.name)
        .bind(employee.email.as_str())
        .bind(employee.password_hash.as_deref())
        .bind(employee.role.as_str())
        .bind(employee.department_id.as_uuid())
        .bind(current)
        .bind(employee.meta.created_at)
        .bind(employee.meta.updated_at)
        .bind(employee.meta.deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("upsert_employee", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_save_employee", e))?;
        Ok(employee.clone())
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    async fn soft_delete(&self, id: EmployeeId, at: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE employee SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_uuid())
        .bind(at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("soft_delete_employee", e))?;
        Ok(result.rows_affected())
    }
}

async fn upsert_address(tx: &mut Transaction<'_, Postgres>, address: &Address) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO address (
            id, address, city, district, state, country, created_at, updated_at, deleted_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            address = EXCLUDED.address,
            city = EXCLUDED.city,
            district = EXCLUDED.district,
            state = EXCLUDED.state,
            country = EXCLUDED.country,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        "#,
    )
    .bind(address.id.as_uuid())
    .bind(&address.address)
    .bind(&address.city)
    .bind(&address.district)
    .bind(&address.state)
    .bind(&address.country)
    .bind(address.meta.created_at)
    .bind(address.meta.updated_at)
    .bind(address.meta.deleted_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("upsert_address", e))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PostgresDepartmentStore {
    pool: Arc<PgPool>,
}

impl PostgresDepartmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl DepartmentStore for PostgresDepartmentStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Department>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM department
            WHERE deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_departments", e))?;
        rows.iter().map(department_from_row).collect()
    }

    #[instrument(skip(self), fields(department_id = %id), err)]
    async fn find_by_id(&self, id: DepartmentId) -> StoreResult<Option<Department>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM department
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_department_by_id", e))?;
        row.as_ref().map(department_from_row).transpose()
    }

    #[instrument(skip(self, department), fields(department_id = %department.id), err)]
    async fn save(&self, department: &Department) -> StoreResult<Department> {
        sqlx::query(
            r#"
            INSERT INTO department (id, name, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(department.id.as_uuid())
        .bind(&department.name)
        .bind(department.meta.created_at)
        .bind(department.meta.updated_at)
        .bind(department.meta.deleted_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_department", e))?;
        Ok(department.clone())
    }

    #[instrument(skip(self), fields(department_id = %id), err)]
    async fn soft_delete(&self, id: DepartmentId, at: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE department SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_uuid())
        .bind(at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("soft_delete_department", e))?;
        Ok(result.rows_affected())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| StoreError::Backend(format!("failed to decode column {name}: {e}")))
}

fn department_from_row(row: &PgRow) -> StoreResult<Department> {
    Ok(Department {
        id: DepartmentId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        meta: RecordMeta {
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        },
    })
}

fn employee_from_row(row: &PgRow) -> StoreResult<Employee> {
    let email: String = column(row, "email")?;
    let role: String = column(row, "role")?;

    let address = match column::<Option<Uuid>>(row, "a_id")? {
        Some(id) => Some(Address {
            id: AddressId::from_uuid(id),
            address: column(row, "a_address")?,
            city: column(row, "a_city")?,
            district: column(row, "a_district")?,
            state: column(row, "a_state")?,
            country: column(row, "a_country")?,
            meta: RecordMeta {
                created_at: column(row, "a_created_at")?,
                updated_at: column(row, "a_updated_at")?,
                deleted_at: None,
            },
        }),
        None => None,
    };

    Ok(Employee {
        id: EmployeeId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        email: Email::parse(&email).map_err(|e| StoreError::Backend(format!("stored email: {e}")))?,
        password_hash: column(row, "password_hash")?,
        role: Role::from_str(&role).map_err(|e| StoreError::Backend(format!("stored role: {e}")))?,
        department_id: DepartmentId::from_uuid(column(row, "department_id")?),
        address,
        meta: RecordMeta {
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        },
    })
}

/// Map SQLx errors to store errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
