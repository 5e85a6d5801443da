//! Router configuration for the plaza JSON API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_comment, create_post, create_reply, delete_comment, delete_post, delete_reply,
    get_post, health, like_comment, like_post, list_comments, list_posts, list_replies, login, me,
    moderation_posts, not_found, root, signup, update_comment, update_post, update_reply,
    verify_token, AppState,
};
use super::middleware::{create_cors_layer, credential_auth};

/// Base path of every API route.
pub const API_BASE: &str = "/api/v1";

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-token", get(verify_token))
        .route("/me", get(me));

    let post_routes = Router::new()
        .route("/", post(create_post).get(list_posts))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/like", post(like_post));

    let comment_routes = Router::new()
        .route("/", post(create_comment))
        .route("/post/:post_id", get(list_comments))
        .route("/:id", put(update_comment).delete(delete_comment))
        .route("/:id/like", post(like_comment));

    let admin_routes = Router::new()
        .route("/reply", post(create_reply))
        .route("/reply/:id", put(update_reply).delete(delete_reply))
        .route("/replies/:post_id", get(list_replies))
        .route("/moderation/posts", get(moderation_posts));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes)
        .nest("/comments", comment_routes)
        .nest("/admin", admin_routes);

    let tokens = app_state.tokens.clone();

    Router::new()
        .route("/", get(root))
        .nest(API_BASE, api_routes)
        .merge(create_health_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let tokens = tokens.clone();
                    credential_auth(tokens, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
