//! JSON API for plaza.
//!
//! Every route lives under [`router::API_BASE`]. Handlers are thin: they
//! parse ids and bodies, call the content and moderation services with the
//! caller's optional identity, and wrap results in the response envelope.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, API_BASE};
pub use server::WebServer;
