//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{self, Identity, TokenService};
use crate::config::FeedConfig;
use crate::db::{User, UserRepository};
use crate::web::dto::{
    ApiResponse, AuthResponse, LoginRequest, MeResponse, SignupRequest, TokenInfo, UserInfo,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::{Database, PlazaError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (the pool is internally shared).
    pub db: Database,
    /// Credential issuing and verification.
    pub tokens: Arc<TokenService>,
    /// Pagination defaults.
    pub feed: FeedConfig,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, tokens: TokenService, feed: FeedConfig) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            feed,
        }
    }

    /// Issue a credential and wrap it with the user's public info.
    fn auth_response(&self, user: &User) -> Result<AuthResponse, ApiError> {
        let token = self
            .tokens
            .issue(&Identity::from(user))
            .map_err(PlazaError::from)?;
        Ok(AuthResponse {
            token,
            user: UserInfo::from(user),
        })
    }
}

/// POST /api/v1/auth/signup - Register a new account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::register(&repo, req.into()).await?;
    let response = state.auth_response(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response).with_message("User registered successfully")),
    ))
}

/// POST /api/v1/auth/login - Exchange email and password for a credential.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::authenticate(&repo, &req.email, &req.password).await?;
    let response = state.auth_response(&user)?;

    Ok(Json(ApiResponse::new(response).with_message("Login successful")))
}

/// GET /api/v1/auth/verify-token - Decode the presented credential.
pub async fn verify_token(
    AuthUser(identity): AuthUser,
) -> Result<Json<ApiResponse<TokenInfo>>, ApiError> {
    Ok(Json(ApiResponse::new(TokenInfo::from(identity))))
}

/// GET /api/v1/auth/me - The acting user's profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(MeResponse::from(user))))
}
