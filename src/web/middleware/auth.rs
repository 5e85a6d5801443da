//! Bearer credential extraction.
//!
//! The [`TokenService`] is placed in request extensions by [`credential_auth`];
//! the extractor below reads the `Authorization` header and verifies it.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{CredentialError, Identity, TokenService};
use crate::web::error::ApiError;

/// Extract the raw credential from the `Authorization` header.
///
/// Accepts `Bearer <token>` as well as a bare token. Returns `None` when the
/// header is absent or blank.
fn credential_from_parts(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn token_service(parts: &Parts) -> Result<&Arc<TokenService>, ApiError> {
    parts.extensions.get::<Arc<TokenService>>().ok_or_else(|| {
        tracing::error!("Token service missing from request extensions");
        ApiError::internal("An internal error occurred")
    })
}

fn rejection(err: CredentialError) -> ApiError {
    match err {
        CredentialError::Missing => ApiError::unauthorized("No token provided"),
        CredentialError::Invalid => ApiError::unauthorized("Invalid or expired token"),
        CredentialError::Issue(msg) => {
            tracing::error!("Credential failure: {}", msg);
            ApiError::internal("An internal error occurred")
        }
    }
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when the credential is missing, malformed or expired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = token_service(parts)?;
        let token = credential_from_parts(parts).ok_or_else(|| rejection(CredentialError::Missing))?;

        tokens.verify(token).map(AuthUser).map_err(|e| {
            tracing::debug!("Credential rejected: {}", e);
            rejection(e)
        })
    }
}

/// Middleware function to inject the token service into request extensions.
pub async fn credential_auth(
    tokens: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(tokens);
    next.run(request).await
}
