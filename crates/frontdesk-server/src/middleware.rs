//! Session authentication and request-id middleware.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;

/// Extracts the session token from `Authorization: Bearer` or the
/// `x-session-token` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .or_else(|| {
            headers
                .get("x-session-token")
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        })
}

/// Session authentication middleware.
///
/// Resolves the session token to an [`crate::sessions::AuthContext`] and
/// stores it in request extensions for downstream use (handlers and the audit
/// middleware). Unauthenticated requests to protected paths get a 401 JSON
/// body.
pub async fn session_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if should_skip_authentication(req.uri().path()) {
        return next.run(req).await;
    }

    let ctx = session_token(req.headers()).and_then(|token| state.sessions.get(&token));
    match ctx {
        Some(ctx) => {
            tracing::debug!(user = %ctx.username, "session resolved");
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "no valid session");
            ApiError::Unauthorized.into_response()
        }
    }
}

/// Paths reachable without a session.
fn should_skip_authentication(path: &str) -> bool {
    matches!(path, "/" | "/healthz" | "/auth/login")
}

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}
