use chrono::{DateTime, Utc};

use staffdir_core::{DepartmentId, DomainError, DomainResult, Entity, Record, RecordMeta};

/// Organisational unit every employee belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub meta: RecordMeta,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("department name must not be empty"));
    }
    Ok(name.to_string())
}

impl Department {
    pub fn create(name: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: DepartmentId::new(),
            name: validate_name(name)?,
            meta: RecordMeta::new(now),
        })
    }

    pub fn apply(&mut self, update: DepartmentUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = update.name {
            self.name = validate_name(&name)?;
        }
        self.meta.touch(now);
        Ok(())
    }
}

impl Entity for Department {
    type Id = DepartmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Department {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_name() {
        let department = Department::create("  Human Resources ", Utc::now()).unwrap();
        assert_eq!(department.name, "Human Resources");
        assert!(!department.is_deleted());
    }

    #[test]
    fn rename_rejects_blank() {
        let mut department = Department::create("Engineering", Utc::now()).unwrap();
        let err = department
            .apply(DepartmentUpdate { name: Some(" ".to_string()) }, Utc::now())
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(department.name, "Engineering");
    }

    #[test]
    fn empty_update_only_touches() {
        let t0 = Utc::now();
        let mut department = Department::create("Engineering", t0).unwrap();
        let later = t0 + chrono::Duration::seconds(3);

        department.apply(DepartmentUpdate::default(), later).unwrap();

        assert_eq!(department.name, "Engineering");
        assert_eq!(department.meta.updated_at, later);
        assert_eq!(department.meta.created_at, t0);
    }
}
