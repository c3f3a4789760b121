//! Appointment routes.
//!
//! Thin in-memory CRUD over the appointments the AI receptionist books; the
//! route group is wrapped by the audit middleware with entity type
//! `appointment`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;

pub type AppointmentMap = Arc<RwLock<HashMap<String, Appointment>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub clinic_id: String,
    pub patient_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentRequest {
    pub clinic_id: String,
    pub patient_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Appointment>> {
    let map = state.appointments.read().await;
    let mut appointments: Vec<Appointment> = map.values().cloned().collect();
    appointments.sort_by_key(|a| a.scheduled_at);
    Json(appointments)
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<AppointmentRequest>,
) -> (StatusCode, Json<Appointment>) {
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        clinic_id: body.clinic_id,
        patient_name: body.patient_name,
        scheduled_at: body.scheduled_at,
        reason: body.reason,
        status: body.status.unwrap_or(AppointmentStatus::Scheduled),
    };
    state
        .appointments
        .write()
        .await
        .insert(appointment.id.clone(), appointment.clone());
    (StatusCode::CREATED, Json(appointment))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    state
        .appointments
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("appointment {id}")))
}

/// PUT is a full upsert: the dashboard edits appointments in place and may
/// push ids minted elsewhere (e.g. by the phone system).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AppointmentRequest>,
) -> Json<Appointment> {
    let appointment = Appointment {
        id: id.clone(),
        clinic_id: body.clinic_id,
        patient_name: body.patient_name,
        scheduled_at: body.scheduled_at,
        reason: body.reason,
        status: body.status.unwrap_or(AppointmentStatus::Scheduled),
    };
    state
        .appointments
        .write()
        .await
        .insert(id, appointment.clone());
    Json(appointment)
}

/// DELETE cancels rather than erases; the appointment history stays visible.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut map = state.appointments.write().await;
    match map.get_mut(&id) {
        Some(appointment) => {
            appointment.status = AppointmentStatus::Cancelled;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("appointment {id}"))),
    }
}
