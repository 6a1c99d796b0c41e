//! Entity trait: identity + continuity across state changes.
//!
//! Every stored record also carries [`RecordMeta`]: creation/update timestamps
//! and an optional tombstone. Deleting a record only sets the tombstone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Bookkeeping timestamps shared by all persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Tombstone the record. Idempotent: the first deletion time is kept.
    pub fn tombstone(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// An entity persisted with [`RecordMeta`] (soft-delete aware).
pub trait Record: Entity {
    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted()
    }

    fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.meta_mut().tombstone(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn tombstone_keeps_first_deletion_time() {
        let t0 = Utc::now();
        let mut meta = RecordMeta::new(t0);
        assert!(!meta.is_deleted());

        meta.tombstone(t0 + Duration::seconds(1));
        meta.tombstone(t0 + Duration::seconds(5));

        assert_eq!(meta.deleted_at, Some(t0 + Duration::seconds(1)));
        assert_eq!(meta.created_at, t0);
    }
}
