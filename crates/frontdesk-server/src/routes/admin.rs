//! Compliance review endpoints.
//!
//! Read-only access to the audit trail for administrators. Listing is not
//! itself trailed; bulk export is, with action `EXPORT`.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde_json::json;

use frontdesk_audit::{AuditAction, AuditLogData, AuditQuery, AuditRecord};

use crate::audit::ClientMeta;
use crate::error::ApiError;
use crate::server::AppState;
use crate::sessions::AuthContext;

fn require_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("admin role required".to_string()))
    }
}

/// `GET /admin/audit-log` — filtered listing, oldest first.
pub async fn list_audit_log(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    require_admin(&auth)?;
    let records = state.audit_store.list(&query).await?;
    Ok(Json(records))
}

/// `GET /admin/audit-log/export` — bulk retrieval for external archival.
pub async fn export_audit_log(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ClientMeta(ctx): ClientMeta,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    require_admin(&auth)?;
    let records = state.audit_store.list(&query).await?;

    let data = AuditLogData::new(&auth.user_id, AuditAction::Export, "audit_log")
        .details(json!({ "count": records.len() }));
    let recorder = state.recorder.clone();
    tokio::spawn(async move { recorder.record(&ctx, data).await });

    Ok(Json(records))
}
