//! Storage seam for audit records.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::action::AuditAction;
use crate::error::AuditStoreError;
use crate::record::AuditRecord;

/// Persistence contract for the audit trail.
///
/// Backends are append-only from the recorder's point of view: `insert` is the
/// only operation the write path depends on, and each insert is atomic and
/// independent — no transactions span records and records never reference each
/// other. `list` exists solely for the compliance review surface.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persists one record. Either the whole record is stored or nothing is.
    async fn insert(&self, record: AuditRecord) -> Result<(), AuditStoreError>;

    /// Returns records matching the query, oldest first.
    async fn list(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError>;
}

/// Shared handle to a store implementation.
pub type DynAuditStore = Arc<dyn AuditStore>;

/// Filter for the compliance review listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub clinic_id: Option<String>,
    pub entity_type: Option<String>,
    pub action: Option<AuditAction>,
    /// Inclusive lower bound on `recorded_at`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub since: Option<OffsetDateTime>,
    /// Exclusive upper bound on `recorded_at`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub until: Option<OffsetDateTime>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Whether a record satisfies every set filter.
    #[must_use]
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(user_id) = &self.user_id
            && record.user_id != *user_id
        {
            return false;
        }
        if let Some(clinic_id) = &self.clinic_id
            && record.clinic_id.as_deref() != Some(clinic_id.as_str())
        {
            return false;
        }
        if let Some(entity_type) = &self.entity_type
            && record.entity_type != *entity_type
        {
            return false;
        }
        if let Some(action) = self.action
            && record.action != action
        {
            return false;
        }
        if let Some(since) = self.since
            && record.recorded_at < since
        {
            return false;
        }
        if let Some(until) = self.until
            && record.recorded_at >= until
        {
            return false;
        }
        true
    }
}
