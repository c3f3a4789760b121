//! Audit record model and request-derived metadata.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use crate::action::AuditAction;

/// How long audit records must be kept before they become purge-eligible.
pub const RETENTION_YEARS: i32 = 7;

/// One immutable audit trail entry.
///
/// Created exactly once per qualifying access event, at response time, and
/// never updated afterwards. Deletion is only permitted once `retention_date`
/// has elapsed; the purge itself is enforced outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record id, assigned at write time.
    pub id: Uuid,

    /// The acting principal. Always present: events without an authenticated
    /// user are not audited.
    pub user_id: String,

    /// Tenant scope, when the principal belongs to a clinic.
    pub clinic_id: Option<String>,

    /// What kind of access took place.
    pub action: AuditAction,

    /// Category of the resource accessed ("appointment", "call_log", ...).
    pub entity_type: String,

    /// Identifier of the specific resource instance, when one was addressed.
    pub entity_id: Option<String>,

    /// Opaque forensic context (request path, method, query parameters).
    pub details: Option<Value>,

    /// Client address, proxy-aware (see [`RequestContext::client_ip`]).
    pub ip_address: Option<String>,

    /// User agent reported by the client.
    pub user_agent: Option<String>,

    /// Outcome of the trailed operation.
    pub successful: bool,

    /// Failure detail when `successful` is false.
    pub error_message: Option<String>,

    /// Insertion timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,

    /// Earliest date this record may be purged: `recorded_at` plus exactly
    /// seven calendar years.
    #[serde(with = "time::serde::rfc3339")]
    pub retention_date: OffsetDateTime,
}

/// Computes the retention deadline for a record written at `recorded_at`.
///
/// Same month and day, year advanced by [`RETENTION_YEARS`]. A Feb 29 write
/// date falls back to Feb 28 of the target year, which is never a leap year
/// when the offset is seven.
#[must_use]
pub fn retention_from(recorded_at: OffsetDateTime) -> OffsetDateTime {
    let date = recorded_at.date();
    let target_year = date.year() + RETENTION_YEARS;
    let target = date.replace_year(target_year).unwrap_or_else(|_| {
        Date::from_calendar_date(target_year, Month::February, 28)
            .expect("Feb 28 exists in every year")
    });
    recorded_at.replace_date(target)
}

/// Caller-supplied fields for one audit write.
///
/// `user_id` is required by construction: an event with no authenticated
/// principal does not require an audit record, and callers must skip the
/// recorder call entirely rather than invent an empty id.
#[derive(Debug, Clone)]
pub struct AuditLogData {
    pub user_id: String,
    pub clinic_id: Option<String>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<Value>,
    pub successful: bool,
    pub error_message: Option<String>,
}

impl AuditLogData {
    /// Creates log data for a successful event with the required fields.
    pub fn new(
        user_id: impl Into<String>,
        action: AuditAction,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            clinic_id: None,
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            details: None,
            successful: true,
            error_message: None,
        }
    }

    /// Sets the tenant scope.
    #[must_use]
    pub fn clinic_id(mut self, id: impl Into<String>) -> Self {
        self.clinic_id = Some(id.into());
        self
    }

    /// Sets the specific resource instance id.
    #[must_use]
    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Attaches forensic context.
    #[must_use]
    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Marks the event as failed with the given detail.
    #[must_use]
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.successful = false;
        self.error_message = Some(error_message.into());
        self
    }
}

/// Request metadata the recorder needs, extracted ahead of time.
///
/// The recorder takes this explicit view instead of an HTTP request object so
/// that the audit crate has no framework dependency and the derivation rules
/// stay testable in isolation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Raw `x-forwarded-for` header value, if present.
    pub forwarded_for: Option<String>,
    /// Raw `x-real-ip` header value, if present.
    pub real_ip: Option<String>,
    /// Remote address of the underlying connection.
    pub remote_addr: Option<SocketAddr>,
    /// `user-agent` header value, if present.
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Derives the client address with proxy-aware precedence:
    /// first `x-forwarded-for` entry, then `x-real-ip`, then the
    /// connection's remote address.
    #[must_use]
    pub fn client_ip(&self) -> Option<String> {
        self.forwarded_for
            .as_deref()
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| {
                self.real_ip
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
            .or_else(|| self.remote_addr.map(|addr| addr.ip().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn retention_is_seven_calendar_years() {
        let written = datetime!(2026-08-27 14:30:00 UTC);
        let retention = retention_from(written);
        assert_eq!(retention, datetime!(2033-08-27 14:30:00 UTC));
    }

    #[test]
    fn retention_crosses_leap_years_on_plain_dates() {
        // 2028 is a leap year between write and retention; day/month unchanged.
        let written = datetime!(2027-03-01 00:00:00 UTC);
        assert_eq!(retention_from(written), datetime!(2034-03-01 00:00:00 UTC));
    }

    #[test]
    fn retention_for_leap_day_falls_back_to_feb_28() {
        let written = datetime!(2024-02-29 09:00:00 UTC);
        assert_eq!(retention_from(written), datetime!(2031-02-28 09:00:00 UTC));
    }

    #[test]
    fn client_ip_prefers_first_forwarded_entry() {
        let ctx = RequestContext {
            forwarded_for: Some("203.0.113.5, 10.0.0.1".to_string()),
            real_ip: Some("10.0.0.2".to_string()),
            remote_addr: Some("127.0.0.1:9999".parse().unwrap()),
            user_agent: None,
        };
        assert_eq!(ctx.client_ip().as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_remote_addr() {
        let ctx = RequestContext {
            forwarded_for: None,
            real_ip: Some(" 10.0.0.2 ".to_string()),
            remote_addr: Some("192.0.2.1:443".parse().unwrap()),
            user_agent: None,
        };
        assert_eq!(ctx.client_ip().as_deref(), Some("10.0.0.2"));

        let ctx = RequestContext {
            remote_addr: Some("192.0.2.1:443".parse().unwrap()),
            ..RequestContext::default()
        };
        assert_eq!(ctx.client_ip().as_deref(), Some("192.0.2.1"));
    }

    #[test]
    fn client_ip_ignores_empty_forwarded_header() {
        let ctx = RequestContext {
            forwarded_for: Some("  ".to_string()),
            real_ip: Some("10.0.0.2".to_string()),
            ..RequestContext::default()
        };
        assert_eq!(ctx.client_ip().as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn client_ip_is_none_without_any_source() {
        assert_eq!(RequestContext::default().client_ip(), None);
    }
}
