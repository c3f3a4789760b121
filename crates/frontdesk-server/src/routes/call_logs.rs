//! Call log routes.
//!
//! Call records are produced by the AI receptionist and read by the
//! dashboard. Entity type for the audit middleware: `call_log`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;

pub type CallLogMap = Arc<RwLock<HashMap<String, CallLog>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Answered,
    BookedAppointment,
    TransferredToStaff,
    Voicemail,
    Abandoned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLog {
    pub id: String,
    pub clinic_id: String,
    pub caller_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_seconds: u32,
    pub outcome: CallOutcome,
    pub transcript_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallLogRequest {
    pub clinic_id: String,
    pub caller_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_seconds: u32,
    pub outcome: CallOutcome,
    #[serde(default)]
    pub transcript_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallLogFilter {
    pub clinic_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CallLogFilter>,
) -> Json<Vec<CallLog>> {
    let map = state.call_logs.read().await;
    let mut logs: Vec<CallLog> = map
        .values()
        .filter(|log| {
            filter
                .clinic_id
                .as_deref()
                .is_none_or(|clinic| log.clinic_id == clinic)
        })
        .cloned()
        .collect();
    logs.sort_by_key(|log| log.started_at);
    Json(logs)
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CallLog>, ApiError> {
    state
        .call_logs
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("call log {id}")))
}

/// Ingest endpoint for the phone system.
pub async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<CallLogRequest>,
) -> (StatusCode, Json<CallLog>) {
    let log = CallLog {
        id: Uuid::new_v4().to_string(),
        clinic_id: body.clinic_id,
        caller_number: body.caller_number,
        started_at: body.started_at,
        duration_seconds: body.duration_seconds,
        outcome: body.outcome,
        transcript_summary: body.transcript_summary,
    };
    state
        .call_logs
        .write()
        .await
        .insert(log.id.clone(), log.clone());
    (StatusCode::CREATED, Json(log))
}
