use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use staffdir_core::{DepartmentId, Email, EmployeeId, Record};
use staffdir_departments::Department;
use staffdir_employees::Employee;

use super::{DepartmentStore, EmployeeStore, StoreError, StoreResult};

/// In-memory keyed store for soft-deletable records (tests/dev).
///
/// Tombstoned records stay in the map and are filtered out on read.
#[derive(Debug)]
pub struct InMemoryRecordStore<V: Record> {
    inner: RwLock<HashMap<V::Id, V>>,
}

impl<V: Record> InMemoryRecordStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Record> Default for InMemoryRecordStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

impl<V> InMemoryRecordStore<V>
where
    V: Record + Clone,
{
    pub fn get(&self, id: &V::Id) -> StoreResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).filter(|v| !v.is_deleted()).cloned())
    }

    /// Live records, oldest first.
    pub fn list(&self) -> StoreResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<V> = map.values().filter(|v| !v.is_deleted()).cloned().collect();
        out.sort_by_key(|v| v.meta().created_at);
        Ok(out)
    }

    pub fn find(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|v| !v.is_deleted() && pred(v)).cloned())
    }

    /// Upsert `value` unless `clashes` matches another live record.
    pub fn upsert_unless(
        &self,
        value: &V,
        clashes: impl Fn(&V, &V) -> bool,
        conflict: &str,
    ) -> StoreResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !value.is_deleted() {
            let taken = map
                .values()
                .any(|v| v.id() != value.id() && !v.is_deleted() && clashes(v, value));
            if taken {
                return Err(StoreError::Conflict(conflict.to_string()));
            }
        }
        map.insert(value.id().clone(), value.clone());
        Ok(value.clone())
    }

    pub fn upsert(&self, value: &V) -> StoreResult<V> {
        self.upsert_unless(value, |_, _| false, "")
    }

    pub fn tombstone(&self, id: &V::Id, at: DateTime<Utc>) -> StoreResult<u64> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(id) {
            Some(v) if !v.is_deleted() => {
                v.soft_delete(at);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    records: InMemoryRecordStore<Employee>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        self.records.list()
    }

    async fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        self.records.get(&id)
    }

    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Employee>> {
        self.records.find(|e| &e.email == email)
    }

    async fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        self.records
            .upsert_unless(employee, |a, b| a.email == b.email, "email already in use")
    }

    async fn soft_delete(&self, id: EmployeeId, at: DateTime<Utc>) -> StoreResult<u64> {
        self.records.tombstone(&id, at)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDepartmentStore {
    records: InMemoryRecordStore<Department>,
}

impl InMemoryDepartmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentStore for InMemoryDepartmentStore {
    async fn list(&self) -> StoreResult<Vec<Department>> {
        self.records.list()
    }

    async fn find_by_id(&self, id: DepartmentId) -> StoreResult<Option<Department>> {
        self.records.get(&id)
    }

    async fn save(&self, department: &Department) -> StoreResult<Department> {
        self.records.upsert(department)
    }

    async fn soft_delete(&self, id: DepartmentId, at: DateTime<Utc>) -> StoreResult<u64> {
        self.records.tombstone(&id, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use staffdir_auth::Role;
    use staffdir_employees::NewEmployee;

    fn employee(email: &str, department_id: DepartmentId, now: DateTime<Utc>) -> Employee {
        Employee::create(
            NewEmployee {
                name: "Test Person".to_string(),
                email: Email::parse(email).unwrap(),
                password_hash: None,
                role: Role::Engineer,
                department_id,
            },
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn deleted_records_are_invisible() {
        let store = InMemoryDepartmentStore::new();
        let now = Utc::now();
        let dept = Department::create("Engineering", now).unwrap();
        store.save(&dept).await.unwrap();

        assert_eq!(store.soft_delete(dept.id, now).await.unwrap(), 1);
        assert_eq!(store.soft_delete(dept.id, now).await.unwrap(), 0);
        assert!(store.find_by_id(dept.id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.soft_delete(DepartmentId::new(), now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = InMemoryDepartmentStore::new();
        let t0 = Utc::now();
        let later = Department::create("Later", t0 + Duration::seconds(5)).unwrap();
        let earlier = Department::create("Earlier", t0).unwrap();
        store.save(&later).await.unwrap();
        store.save(&earlier).await.unwrap();

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
    }

    #[tokio::test]
    async fn live_email_must_be_unique() {
        let store = InMemoryEmployeeStore::new();
        let now = Utc::now();
        let dept = DepartmentId::new();

        let first = employee("dup@example.com", dept, now);
        store.save(&first).await.unwrap();

        let second = employee("DUP@example.com", dept, now);
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Re-saving the same record is not a clash with itself.
        store.save(&first).await.unwrap();

        store.soft_delete(first.id, now).await.unwrap();
        store.save(&second).await.unwrap();

        let found = store
            .find_by_email(&Email::parse("dup@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, second.id);
    }
}
