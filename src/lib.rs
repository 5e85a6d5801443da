//! plaza - community feed backend
//!
//! Posts, comments, official admin replies and likes behind a JSON API,
//! with bearer credentials and per-operation authorization.

pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod logging;
pub mod moderation;
pub mod web;

pub use auth::{Identity, Operation, TokenService};
pub use config::Config;
pub use content::{AdminReply, Comment, ContentService, Post, PostThread};
pub use db::{Database, NewUser, Role, User, UserRepository};
pub use error::{PlazaError, Result};
pub use moderation::ModerationService;
pub use web::WebServer;
