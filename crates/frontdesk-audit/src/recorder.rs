//! The audit recorder service.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuditStoreError;
use crate::record::{AuditLogData, AuditRecord, RequestContext, retention_from};
use crate::store::DynAuditStore;

/// Writes audit records without ever failing its caller.
///
/// Audit logging is a compliance side-channel: a storage outage must never
/// block or fail the business operation being observed. [`AuditRecorder::record`]
/// therefore absorbs every storage failure, reporting it on the operational
/// log channel only. The fallible core is exposed as
/// [`AuditRecorder::try_record`] for callers (and tests) that want the
/// outcome.
#[derive(Clone)]
pub struct AuditRecorder {
    store: DynAuditStore,
}

impl AuditRecorder {
    pub fn new(store: DynAuditStore) -> Self {
        Self { store }
    }

    /// Builds and persists one record, propagating storage failures.
    ///
    /// Derives the client address and user agent from `ctx`, stamps the
    /// record with the current time, and computes the retention deadline as
    /// now plus exactly seven calendar years.
    pub async fn try_record(
        &self,
        ctx: &RequestContext,
        data: AuditLogData,
    ) -> Result<AuditRecord, AuditStoreError> {
        let now = OffsetDateTime::now_utc();
        let record = AuditRecord {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            clinic_id: data.clinic_id,
            action: data.action,
            entity_type: data.entity_type,
            entity_id: data.entity_id,
            details: data.details,
            ip_address: ctx.client_ip(),
            user_agent: ctx.user_agent.clone(),
            successful: data.successful,
            error_message: data.error_message,
            recorded_at: now,
            retention_date: retention_from(now),
        };

        self.store.insert(record.clone()).await?;

        tracing::debug!(
            audit_id = %record.id,
            action = %record.action,
            entity_type = %record.entity_type,
            "audit record written"
        );

        Ok(record)
    }

    /// Builds and persists one record, absorbing any storage failure.
    ///
    /// This is the operation the request path uses. It cannot return an
    /// error: failures are logged via `tracing::error!` and swallowed, and
    /// no partial record is left behind.
    pub async fn record(&self, ctx: &RequestContext, data: AuditLogData) {
        let action = data.action;
        let entity_type = data.entity_type.clone();
        if let Err(e) = self.try_record(ctx, data).await {
            tracing::error!(
                error = %e,
                action = %action,
                entity_type = %entity_type,
                "failed to write audit record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::action::AuditAction;
    use crate::store::{AuditQuery, AuditStore};

    /// Collects inserted records for assertions.
    #[derive(Default)]
    struct VecStore {
        records: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditStore for VecStore {
        async fn insert(&self, record: AuditRecord) -> Result<(), AuditStoreError> {
            self.records.lock().await.push(record);
            Ok(())
        }

        async fn list(&self, _query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError> {
            Ok(self.records.lock().await.clone())
        }
    }

    /// Fails every operation, simulating a storage outage.
    struct BrokenStore;

    #[async_trait]
    impl AuditStore for BrokenStore {
        async fn insert(&self, _record: AuditRecord) -> Result<(), AuditStoreError> {
            Err(AuditStoreError::connection("audit database unreachable"))
        }

        async fn list(&self, _query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError> {
            Err(AuditStoreError::connection("audit database unreachable"))
        }
    }

    fn ctx_with_headers() -> RequestContext {
        RequestContext {
            forwarded_for: Some("203.0.113.5, 10.0.0.1".to_string()),
            real_ip: Some("10.0.0.2".to_string()),
            remote_addr: Some("127.0.0.1:4000".parse().unwrap()),
            user_agent: Some("frontdesk-dashboard/1.0".to_string()),
        }
    }

    #[tokio::test]
    async fn record_populates_derived_fields() {
        let store = Arc::new(VecStore::default());
        let recorder = AuditRecorder::new(store.clone());

        let data = AuditLogData::new("u1", AuditAction::Update, "appointment")
            .clinic_id("c9")
            .entity_id("42");
        recorder.record(&ctx_with_headers(), data).await;

        let records = store.records.lock().await;
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.user_id, "u1");
        assert_eq!(rec.clinic_id.as_deref(), Some("c9"));
        assert_eq!(rec.action, AuditAction::Update);
        assert_eq!(rec.entity_id.as_deref(), Some("42"));
        assert_eq!(rec.ip_address.as_deref(), Some("203.0.113.5"));
        assert_eq!(rec.user_agent.as_deref(), Some("frontdesk-dashboard/1.0"));
        assert!(rec.successful);
        assert_eq!(rec.retention_date, retention_from(rec.recorded_at));
    }

    #[tokio::test]
    async fn record_never_fails_on_storage_outage() {
        let recorder = AuditRecorder::new(Arc::new(BrokenStore));
        let data = AuditLogData::new("u1", AuditAction::Read, "call_log");
        // Must simply return; an unwind here would fail the test.
        recorder.record(&RequestContext::default(), data).await;
    }

    #[tokio::test]
    async fn try_record_surfaces_storage_failures() {
        let recorder = AuditRecorder::new(Arc::new(BrokenStore));
        let data = AuditLogData::new("u1", AuditAction::Read, "call_log");
        let err = recorder
            .try_record(&RequestContext::default(), data)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditStoreError::Connection { .. }));
    }

    #[tokio::test]
    async fn failed_events_carry_error_detail() {
        let store = Arc::new(VecStore::default());
        let recorder = AuditRecorder::new(store.clone());

        let data = AuditLogData::new("u2", AuditAction::Login, "session")
            .failed("invalid credentials");
        recorder.record(&RequestContext::default(), data).await;

        let records = store.records.lock().await;
        assert!(!records[0].successful);
        assert_eq!(records[0].error_message.as_deref(), Some("invalid credentials"));
    }
}
