//! Application state and router assembly.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use frontdesk_audit::{AuditRecorder, DynAuditStore};
use frontdesk_store_memory::InMemoryAuditStore;

use crate::audit::{AuditLayerState, record_protected_access};
use crate::config::AppConfig;
use crate::middleware::{request_id, session_auth};
use crate::routes;
use crate::routes::appointments::AppointmentMap;
use crate::routes::call_logs::CallLogMap;
use crate::routes::clinics::ClinicSettingsMap;
use crate::sessions::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub recorder: Arc<AuditRecorder>,
    pub audit_store: DynAuditStore,
    pub appointments: AppointmentMap,
    pub call_logs: CallLogMap,
    pub clinic_settings: ClinicSettingsMap,
}

/// Builds the application with an in-memory audit store.
pub fn build_app(config: AppConfig) -> Router {
    build_app_with_store(config, Arc::new(InMemoryAuditStore::new()))
}

/// Builds the application against a caller-supplied audit store.
///
/// Tests keep a handle to the store to assert on the written trail.
pub fn build_app_with_store(config: AppConfig, audit_store: DynAuditStore) -> Router {
    let recorder = Arc::new(AuditRecorder::new(audit_store.clone()));
    let audit_config = Arc::new(config.audit.clone());

    let state = AppState {
        config: Arc::new(config),
        sessions: Arc::new(SessionStore::new()),
        recorder: recorder.clone(),
        audit_store,
        appointments: AppointmentMap::default(),
        call_logs: CallLogMap::default(),
        clinic_settings: ClinicSettingsMap::default(),
    };

    let audit = |entity_type: &'static str| {
        axum::middleware::from_fn_with_state(
            AuditLayerState::new(recorder.clone(), audit_config.clone(), entity_type),
            record_protected_access,
        )
    };

    let appointments = Router::new()
        .route(
            "/",
            get(routes::appointments::list).post(routes::appointments::create),
        )
        .route(
            "/{id}",
            get(routes::appointments::get_one)
                .put(routes::appointments::update)
                .delete(routes::appointments::cancel),
        )
        .route_layer(audit("appointment"));

    let call_logs = Router::new()
        .route(
            "/",
            get(routes::call_logs::list).post(routes::call_logs::ingest),
        )
        .route("/{id}", get(routes::call_logs::get_one))
        .route_layer(audit("call_log"));

    let clinics = Router::new()
        .route(
            "/{clinicId}/settings",
            get(routes::clinics::get_settings).put(routes::clinics::update_settings),
        )
        .route_layer(audit("clinic_settings"));

    let admin = Router::new()
        .route("/audit-log", get(routes::admin::list_audit_log))
        .route("/audit-log/export", get(routes::admin::export_audit_log));

    Router::new()
        .route("/healthz", get(routes::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .nest("/api/appointments", appointments)
        .nest("/api/call-logs", call_logs)
        .nest("/api/clinics", clinics)
        .nest("/admin", admin)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth,
        ))
        .layer(axum::middleware::from_fn(request_id))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
