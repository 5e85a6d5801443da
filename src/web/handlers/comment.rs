//! Comment handlers.

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
    ApiResponse, CommentResponse, CreateCommentRequest, LikeResponse, PageQuery,
    UpdateContentRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/v1/comments - Comment on a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>), ApiError> {
    let comment = ContentService::new(&state.db)
        .create_comment(Some(&identity), req.post_id, &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::new(CommentResponse::from(comment))
                .with_message("Comment created successfully"),
        ),
    ))
}

/// GET /api/v1/comments/post/:postId - Paginated comments on a post.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref(), &state.feed);
    let comments = ContentService::new(&state.db)
        .list_comments(post_id, page)
        .await?;

    Ok(Json(ApiResponse::paginated(comments, CommentResponse::from)))
}

/// PUT /api/v1/comments/:id - Replace a comment's content (owner only).
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateContentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let comment = ContentService::new(&state.db)
        .update_comment(Some(&identity), id, &req.content)
        .await?;

    Ok(Json(
        ApiResponse::new(CommentResponse::from(comment))
            .with_message("Comment updated successfully"),
    ))
}

/// DELETE /api/v1/comments/:id - Delete a comment (owner or admin).
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "comment")?;
    ModerationService::new(&state.db)
        .delete_comment(Some(&identity), id)
        .await?;

    Ok(Json(ApiResponse::message("Comment deleted successfully")))
}

/// POST /api/v1/comments/:id/like - Toggle the caller's like.
pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let (outcome, comment) = ModerationService::new(&state.db)
        .like_comment(Some(&identity), id)
        .await?;

    let message = if outcome.liked {
        "Comment liked"
    } else {
        "Comment unliked"
    };
    Ok(Json(
        ApiResponse::new(LikeResponse {
            liked: outcome.liked,
            likes: comment.likes,
            liked_by: comment.liked_by,
        })
        .with_message(message),
    ))
}
