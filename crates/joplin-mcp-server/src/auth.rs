//! `x-api-key` gate in front of every route except health and discovery
//! probes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

const HEALTH_PATH: &str = "/health";
const WELL_KNOWN_PREFIX: &str = "/.well-known/";

/// The configured secret, shared with the middleware.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Compare without short-circuiting on the first differing byte.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        let expected = Sha256::digest(self.0.as_bytes());
        let actual = Sha256::digest(candidate);
        expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Paths served without a key.
pub fn is_public_path(path: &str) -> bool {
    path == HEALTH_PATH || path.starts_with(WELL_KNOWN_PREFIX)
}

pub async fn require_api_key(
    State(key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|value| key.matches(value.as_bytes()));

    if authorized {
        next.run(request).await
    } else {
        debug!(path = %request.uri().path(), "Rejected request without valid API key");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response()
    }
}
