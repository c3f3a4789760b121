//! # frontdesk-server
//!
//! HTTP API for the Frontdesk clinic dashboard: session-authenticated REST
//! routes for appointments, call logs, and clinic settings, with an audit
//! trail written for every successful access to protected data.
//!
//! The audit middleware in [`audit`] is the compliance-critical piece: it
//! inspects each response after the handler runs and hands a record off to the
//! [`frontdesk_audit::AuditRecorder`] without ever delaying or failing the
//! response.

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod sessions;

pub use config::{AppConfig, AuditConfig, DashboardUser, load_config};
pub use server::{AppState, build_app, build_app_with_store};
