//! Middleware for Web API.

pub mod auth;
pub mod cors;

pub use auth::{credential_auth, AuthUser};
pub use cors::create_cors_layer;
