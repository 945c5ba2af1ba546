//! Session gate applied to every protected route.
//!
//! A missing or unresolvable token fails with 401 before any handler or
//! resource lookup runs; a resolved one attaches `CurrentUser` to the
//! request for handlers and the ownership check downstream.

use axum::{extract::{Request, State}, middleware::Next, response::Response};
use tracing::warn;

use crate::errors::JsonApiError;

use super::auth::ServerState;

/// Pull the session token out of the `Cookie` header.
fn session_token(req: &Request, cookie_name: &str) -> Option<String> {
    let cookie_header = req
        .headers()
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let prefix = format!("{}=", cookie_name);
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some(rest) = kv.strip_prefix(prefix.as_str()) {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();

    let Some(token) = session_token(&req, &state.session_cfg.cookie_name) else {
        warn!(path = %path, "missing session cookie");
        return Err(JsonApiError::unauthorized());
    };

    match state.sessions.resolve(&token).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => {
            warn!(path = %path, "invalid or expired session token");
            Err(JsonApiError::unauthorized())
        }
    }
}
