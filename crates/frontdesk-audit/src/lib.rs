//! # frontdesk-audit
//!
//! Compliance audit trail for the Frontdesk dashboard backend.
//!
//! Every access to protected health information (PHI) served by the API is
//! trailed as one immutable [`AuditRecord`], written at response time and kept
//! for a mandatory seven-year retention period. The crate provides:
//!
//! - The record model and action taxonomy ([`AuditRecord`], [`AuditAction`])
//! - The [`AuditStore`] trait that persistence backends implement
//! - The [`AuditRecorder`] service, whose `record` operation is guaranteed to
//!   never surface a failure to its caller
//!
//! This crate is deliberately HTTP-framework-free: request-derived metadata is
//! passed in as an explicit [`RequestContext`] so the recorder can be tested
//! in isolation. The axum middleware that drives it lives in
//! `frontdesk-server`.
//!
//! ## Example
//!
//! ```ignore
//! use frontdesk_audit::{AuditAction, AuditLogData, AuditRecorder, RequestContext};
//!
//! async fn trail_read(recorder: &AuditRecorder, ctx: &RequestContext) {
//!     let data = AuditLogData::new("u1", AuditAction::Read, "appointment")
//!         .entity_id("42");
//!     // Never fails; storage errors are logged and swallowed.
//!     recorder.record(ctx, data).await;
//! }
//! ```

mod action;
mod error;
mod record;
mod recorder;
mod store;

pub use action::AuditAction;
pub use error::AuditStoreError;
pub use record::{AuditLogData, AuditRecord, RETENTION_YEARS, RequestContext, retention_from};
pub use recorder::AuditRecorder;
pub use store::{AuditQuery, AuditStore, DynAuditStore};
