//! HTTP route handlers.

pub mod admin;
pub mod appointments;
pub mod auth;
pub mod call_logs;
pub mod clinics;

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe, unauthenticated.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
