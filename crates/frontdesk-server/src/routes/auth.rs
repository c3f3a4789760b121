//! Login and logout.
//!
//! Authentication events are part of the compliance trail: successful and
//! failed logins for known accounts are recorded explicitly through the
//! recorder (the audit middleware only covers protected resource routes).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use frontdesk_audit::{AuditAction, AuditLogData};

use crate::audit::ClientMeta;
use crate::error::ApiError;
use crate::middleware::session_token;
use crate::server::AppState;
use crate::sessions::AuthContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub clinic_id: Option<String>,
    pub roles: Vec<String>,
}

pub async fn login(
    State(state): State<AppState>,
    ClientMeta(ctx): ClientMeta,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = state
        .config
        .users
        .iter()
        .find(|u| u.username == body.username)
    else {
        // Unknown account: nothing to attribute a record to.
        return Err(ApiError::Unauthorized);
    };

    if user.password != body.password {
        let mut data =
            AuditLogData::new(&user.user_id, AuditAction::Login, "session").failed("invalid credentials");
        if let Some(clinic_id) = &user.clinic_id {
            data = data.clinic_id(clinic_id.clone());
        }
        let recorder = state.recorder.clone();
        tokio::spawn(async move { recorder.record(&ctx, data).await });
        return Err(ApiError::Unauthorized);
    }

    let auth = AuthContext {
        user_id: user.user_id.clone(),
        username: user.username.clone(),
        clinic_id: user.clinic_id.clone(),
        roles: user.roles.clone(),
    };
    let token = state.sessions.create(auth.clone());

    let mut data = AuditLogData::new(&user.user_id, AuditAction::Login, "session");
    if let Some(clinic_id) = &user.clinic_id {
        data = data.clinic_id(clinic_id.clone());
    }
    let recorder = state.recorder.clone();
    tokio::spawn(async move { recorder.record(&ctx, data).await });

    Ok(Json(LoginResponse {
        token,
        user_id: auth.user_id,
        clinic_id: auth.clinic_id,
        roles: auth.roles,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ClientMeta(ctx): ClientMeta,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token);
    }

    let mut data = AuditLogData::new(&auth.user_id, AuditAction::Logout, "session");
    if let Some(clinic_id) = &auth.clinic_id {
        data = data.clinic_id(clinic_id.clone());
    }
    let recorder = state.recorder.clone();
    tokio::spawn(async move { recorder.record(&ctx, data).await });

    StatusCode::NO_CONTENT
}
