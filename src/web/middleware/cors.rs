//! CORS layer configuration.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Create a CORS layer from `[server] cors_origins`.
///
/// An empty list (or one with no parseable origin) allows any origin
/// without credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed.is_empty() {
        if !origins.is_empty() {
            tracing::warn!(?origins, "No valid CORS origin configured, allowing any");
        }
        return permissive();
    }

    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
        .allow_origin(parsed)
}
