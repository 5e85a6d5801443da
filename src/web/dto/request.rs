//! Request DTOs for Web API.
//!
//! Signup and login fields default to empty strings so that a missing
//! field is reported by the registration rules instead of as bad JSON.

use serde::Deserialize;
use validator::Validate;

use super::validation::no_control_chars;
use crate::auth::SignupRequest as SignupInput;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Password confirmation.
    #[serde(default)]
    pub confirm_password: String,
    /// Requested role ("user" or "admin").
    #[serde(default)]
    pub role: Option<String>,
}

impl From<SignupRequest> for SignupInput {
    fn from(req: SignupRequest) -> Self {
        SignupInput {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            role: req.role,
        }
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Create post request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post body.
    #[serde(default)]
    pub content: String,
}

/// Update request shared by posts, comments and admin replies.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentRequest {
    /// New body.
    #[serde(default)]
    pub content: String,
}

/// Create comment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// Parent post.
    #[validate(range(min = 1, message = "Invalid post ID format"))]
    pub post_id: i64,
    /// Comment body.
    #[serde(default)]
    pub content: String,
}

/// Create admin reply request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    /// Parent post.
    #[validate(range(min = 1, message = "Invalid post ID format"))]
    pub post_id: i64,
    /// Reply body.
    #[serde(default)]
    pub content: String,
}

/// Pagination query (`?page=&limit=`).
///
/// Kept as raw strings; unparseable values fall back to the feed defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based).
    pub page: Option<String>,
    /// Items per page.
    pub limit: Option<String>,
}
