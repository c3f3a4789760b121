//! # frontdesk-store-memory
//!
//! In-memory [`AuditStore`] backend.
//!
//! Backs local development and the integration test suite. Records are held
//! in an append-only vector: inserts push, nothing ever mutates or removes an
//! entry, matching the audit trail's append-only contract. A durable SQL
//! backend belongs in its own crate.

use async_trait::async_trait;
use tokio::sync::RwLock;

use frontdesk_audit::{AuditQuery, AuditRecord, AuditStore, AuditStoreError};

/// Append-only in-memory audit store.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records written so far.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record, in insertion order.
    pub async fn all(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn insert(&self, record: AuditRecord) -> Result<(), AuditStoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError> {
        let records = self.records.read().await;
        let mut matched: Vec<AuditRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_audit::{AuditAction, AuditLogData, AuditRecorder, RequestContext};
    use std::sync::Arc;

    use super::*;

    async fn seed(store: &Arc<InMemoryAuditStore>, user: &str, action: AuditAction, entity: &str) {
        let recorder = AuditRecorder::new(store.clone());
        recorder
            .record(
                &RequestContext::default(),
                AuditLogData::new(user, action, entity),
            )
            .await;
    }

    #[tokio::test]
    async fn insert_appends_in_order() {
        let store = Arc::new(InMemoryAuditStore::new());
        seed(&store, "u1", AuditAction::Read, "appointment").await;
        seed(&store, "u2", AuditAction::Create, "call_log").await;

        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_id, "u1");
        assert_eq!(all[1].user_id, "u2");
        assert!(all[0].recorded_at <= all[1].recorded_at);
    }

    #[tokio::test]
    async fn list_filters_by_user_action_and_entity() {
        let store = Arc::new(InMemoryAuditStore::new());
        seed(&store, "u1", AuditAction::Read, "appointment").await;
        seed(&store, "u1", AuditAction::Update, "appointment").await;
        seed(&store, "u2", AuditAction::Read, "call_log").await;

        let query = AuditQuery {
            user_id: Some("u1".to_string()),
            action: Some(AuditAction::Update),
            ..AuditQuery::default()
        };
        let matched = store.list(&query).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].entity_type, "appointment");

        let query = AuditQuery {
            entity_type: Some("call_log".to_string()),
            ..AuditQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_honors_limit_and_time_bounds() {
        let store = Arc::new(InMemoryAuditStore::new());
        for _ in 0..5 {
            seed(&store, "u1", AuditAction::Read, "appointment").await;
        }

        let query = AuditQuery {
            limit: Some(2),
            ..AuditQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 2);

        let first = store.all().await[0].recorded_at;
        let query = AuditQuery {
            until: Some(first),
            ..AuditQuery::default()
        };
        // `until` is exclusive
        assert!(store.list(&query).await.unwrap().is_empty());

        let query = AuditQuery {
            since: Some(first),
            ..AuditQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 5);
    }
}
