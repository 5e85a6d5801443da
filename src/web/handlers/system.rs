//! Liveness and fallback handlers.

use axum::http::{Method, Uri};

use crate::web::error::ApiError;

/// GET / - Liveness text.
pub async fn root() -> &'static str {
    "Server is running"
}

/// GET /health - Health check.
pub async fn health() -> &'static str {
    "OK"
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("Endpoint not found: {} {}", method, uri.path()))
}
