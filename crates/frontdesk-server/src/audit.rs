//! Audit middleware: records every successful access to protected data.
//!
//! Applied per route group via `axum::middleware::from_fn_with_state`, with
//! the entity type carried in [`AuditLayerState`]. The middleware runs the
//! inner handler first, inspects the response status, and hands the record
//! off to a spawned task so the response is never delayed or failed by the
//! audit write.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, RawPathParams, State};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Request, header::USER_AGENT};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;

use frontdesk_audit::{AuditAction, AuditLogData, AuditRecorder, RequestContext};

use crate::config::AuditConfig;
use crate::sessions::AuthContext;

/// The principal a protected request executed on behalf of.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub clinic_id: Option<String>,
}

/// Seam for resolving the authenticated principal of a request.
///
/// The middleware receives this explicitly instead of reaching into ambient
/// request state, so tests can wire in a fixed principal (or none) without
/// any session plumbing.
pub trait PrincipalResolver: Send + Sync {
    fn resolve(&self, extensions: &Extensions) -> Option<Principal>;
}

/// Production resolver: reads the [`AuthContext`] extension installed by the
/// session middleware.
#[derive(Debug, Default)]
pub struct SessionPrincipalResolver;

impl PrincipalResolver for SessionPrincipalResolver {
    fn resolve(&self, extensions: &Extensions) -> Option<Principal> {
        extensions.get::<AuthContext>().map(|ctx| Principal {
            user_id: ctx.user_id.clone(),
            clinic_id: ctx.clinic_id.clone(),
        })
    }
}

/// Per-route-group state for the audit middleware.
#[derive(Clone)]
pub struct AuditLayerState {
    recorder: Arc<AuditRecorder>,
    config: Arc<AuditConfig>,
    resolver: Arc<dyn PrincipalResolver>,
    entity_type: &'static str,
}

impl AuditLayerState {
    pub fn new(
        recorder: Arc<AuditRecorder>,
        config: Arc<AuditConfig>,
        entity_type: &'static str,
    ) -> Self {
        Self {
            recorder,
            config,
            resolver: Arc::new(SessionPrincipalResolver),
            entity_type,
        }
    }

    /// Replaces the principal resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn PrincipalResolver>) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Records one audit entry for a successful response on a protected route.
///
/// Skip conditions, in order: auditing disabled, no authenticated principal
/// (anonymous successes are not audited), excluded entity type, non-2xx
/// status (unless `log_failed_requests`), reads when `log_read_operations`
/// is off. The response always passes through unchanged.
pub async fn record_protected_access(
    State(state): State<AuditLayerState>,
    params: RawPathParams,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Everything the record needs is captured before the handler consumes
    // the request.
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_owned);
    let ctx = context_from_parts(req.headers(), req.extensions());
    let principal = state.resolver.resolve(req.extensions());
    let entity_id = entity_id_from_params(&params);

    let res = next.run(req).await;
    let status = res.status();

    if !state.config.enabled {
        return res;
    }
    let Some(principal) = principal else {
        return res;
    };
    if state
        .config
        .exclude_entity_types
        .iter()
        .any(|t| t == state.entity_type)
    {
        return res;
    }
    if !status.is_success() && !state.config.log_failed_requests {
        return res;
    }

    let action = AuditAction::from_method(&method);
    if action == AuditAction::Read && !state.config.log_read_operations {
        return res;
    }

    let mut data = AuditLogData::new(principal.user_id, action, state.entity_type).details(json!({
        "path": path,
        "method": method,
        "query": query,
    }));
    if let Some(clinic_id) = principal.clinic_id {
        data = data.clinic_id(clinic_id);
    }
    if let Some(entity_id) = entity_id {
        data = data.entity_id(entity_id);
    }
    if !status.is_success() {
        data = data.failed(status.to_string());
    }

    // Fire and forget: the spawned task owns the write and its failure
    // handling; nothing flows back to the response.
    let recorder = state.recorder.clone();
    tokio::spawn(async move { recorder.record(&ctx, data).await });

    res
}

/// Resolves the audited entity id from route parameters.
///
/// Precedence: `id`, then `clinicId`, then `appointmentId`; first non-empty
/// match wins.
fn entity_id_from_params(params: &RawPathParams) -> Option<String> {
    for key in ["id", "clinicId", "appointmentId"] {
        if let Some((_, value)) = params.iter().find(|(name, value)| *name == key && !value.is_empty())
        {
            return Some(value.to_string());
        }
    }
    None
}

/// Builds the recorder's request view from headers and extensions.
pub fn context_from_parts(headers: &HeaderMap, extensions: &Extensions) -> RequestContext {
    RequestContext {
        forwarded_for: header_value(headers, "x-forwarded-for"),
        real_ip: header_value(headers, "x-real-ip"),
        remote_addr: extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect| connect.0),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Extractor form of [`RequestContext`] for handlers that record explicitly
/// (login, export).
pub struct ClientMeta(pub RequestContext);

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientMeta(context_from_parts(
            &parts.headers,
            &parts.extensions,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn context_captures_proxy_headers_and_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        headers.insert(USER_AGENT, HeaderValue::from_static("frontdesk/1.0"));

        let ctx = context_from_parts(&headers, &Extensions::new());
        assert_eq!(ctx.client_ip().as_deref(), Some("203.0.113.5"));
        assert_eq!(ctx.user_agent.as_deref(), Some("frontdesk/1.0"));
        assert_eq!(ctx.remote_addr, None);
    }

    #[test]
    fn context_uses_connect_info_without_proxy_headers() {
        let mut extensions = Extensions::new();
        let addr: SocketAddr = "192.0.2.9:5000".parse().unwrap();
        extensions.insert(ConnectInfo(addr));

        let ctx = context_from_parts(&HeaderMap::new(), &extensions);
        assert_eq!(ctx.client_ip().as_deref(), Some("192.0.2.9"));
    }

    #[test]
    fn session_resolver_maps_auth_context() {
        let mut extensions = Extensions::new();
        extensions.insert(AuthContext {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
            clinic_id: Some("clinic-1".to_string()),
            roles: vec![],
        });

        let principal = SessionPrincipalResolver.resolve(&extensions).unwrap();
        assert_eq!(principal.user_id, "u1");
        assert_eq!(principal.clinic_id.as_deref(), Some("clinic-1"));

        assert!(SessionPrincipalResolver.resolve(&Extensions::new()).is_none());
    }
}
