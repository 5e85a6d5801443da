//! Post handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_id, AppState};
use crate::content::{ContentService, PageRequest};
use crate::moderation::ModerationService;
use crate::web::dto::{
    ApiResponse, CreatePostRequest, LikeResponse, PageQuery, PostResponse, UpdateContentRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/v1/posts - Create a post.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let post = ContentService::new(&state.db)
        .create_post(Some(&identity), &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PostResponse::from(post)).with_message("Post created successfully")),
    ))
}

/// GET /api/v1/posts - Paginated feed of enabled posts.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref(), &state.feed);
    let threads = ContentService::new(&state.db).list_posts(page).await?;

    Ok(Json(ApiResponse::paginated(threads, PostResponse::from)))
}

/// GET /api/v1/posts/:id - A post with its comments and admin replies.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_id(&id, "post")?;
    let thread = ContentService::new(&state.db).get_post(id).await?;

    Ok(Json(ApiResponse::new(PostResponse::from(thread))))
}

/// PUT /api/v1/posts/:id - Replace a post's content (owner only).
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateContentRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_id(&id, "post")?;
    let post = ContentService::new(&state.db)
        .update_post(Some(&identity), id, &req.content)
        .await?;

    Ok(Json(
        ApiResponse::new(PostResponse::from(post)).with_message("Post updated successfully"),
    ))
}

/// DELETE /api/v1/posts/:id - Delete a post and its children (owner or admin).
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "post")?;
    ModerationService::new(&state.db)
        .delete_post(Some(&identity), id)
        .await?;

    Ok(Json(ApiResponse::message("Post deleted successfully")))
}

/// POST /api/v1/posts/:id/like - Toggle the caller's like.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let id = parse_id(&id, "post")?;
    let (outcome, post) = ModerationService::new(&state.db)
        .like_post(Some(&identity), id)
        .await?;

    let message = if outcome.liked { "Post liked" } else { "Post unliked" };
    Ok(Json(
        ApiResponse::new(LikeResponse {
            liked: outcome.liked,
            likes: post.likes,
            liked_by: post.liked_by,
        })
        .with_message(message),
    ))
}
