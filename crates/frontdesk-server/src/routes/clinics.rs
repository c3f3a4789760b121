//! Clinic receptionist settings.
//!
//! What the AI receptionist says and does per clinic. Entity type for the
//! audit middleware: `clinic_settings`; the route parameter is `clinicId`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::server::AppState;

pub type ClinicSettingsMap = Arc<RwLock<HashMap<String, ClinicSettings>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicSettings {
    pub greeting: String,
    pub business_hours: String,
    pub transfer_number: Option<String>,
    pub voicemail_enabled: bool,
    pub after_hours_message: Option<String>,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            greeting: "Thank you for calling. How can I help you today?".to_string(),
            business_hours: "Mon-Fri 9:00-17:00".to_string(),
            transfer_number: None,
            voicemail_enabled: true,
            after_hours_message: None,
        }
    }
}

/// Unknown clinics resolve to the defaults rather than a 404: every clinic
/// has an effective configuration.
pub async fn get_settings(
    State(state): State<AppState>,
    Path(clinic_id): Path<String>,
) -> Json<ClinicSettings> {
    let settings = state
        .clinic_settings
        .read()
        .await
        .get(&clinic_id)
        .cloned()
        .unwrap_or_default();
    Json(settings)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Path(clinic_id): Path<String>,
    Json(body): Json<ClinicSettings>,
) -> Json<ClinicSettings> {
    state
        .clinic_settings
        .write()
        .await
        .insert(clinic_id, body.clone());
    Json(body)
}
