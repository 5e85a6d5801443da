//! API handlers for the plaza JSON API.

pub mod admin;
pub mod auth;
pub mod comment;
pub mod post;
pub mod system;

pub use admin::*;
pub use auth::*;
pub use comment::*;
pub use post::*;
pub use system::*;

use crate::web::error::ApiError;

/// Parse a path id, rejecting anything that is not a positive integer.
///
/// `what` names the resource in the error, e.g. "post" gives
/// "Invalid post ID format".
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {} ID format", what)))
}
