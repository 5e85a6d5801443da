//! Admin handlers: official replies and the moderation listing.

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
    AdminReplyResponse, ApiResponse, CreateReplyRequest, PageQuery, PostResponse,
    UpdateContentRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

// ============================================================================
// Admin Replies
// ============================================================================

/// POST /api/v1/admin/reply - Post an official reply (admin).
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminReplyResponse>>), ApiError> {
    let reply = ContentService::new(&state.db)
        .create_reply(Some(&identity), req.post_id, &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::new(AdminReplyResponse::from(reply))
                .with_message("Admin reply posted successfully"),
        ),
    ))
}

/// GET /api/v1/admin/replies/:postId - Enabled replies on a post.
pub async fn list_replies(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AdminReplyResponse>>>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let replies = ContentService::new(&state.db).list_replies(post_id).await?;

    let count = replies.len();
    let data: Vec<_> = replies.into_iter().map(AdminReplyResponse::from).collect();
    Ok(Json(ApiResponse::new(data).with_count(count)))
}

/// PUT /api/v1/admin/reply/:id - Replace a reply's content (owning admin).
pub async fn update_reply(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateContentRequest>,
) -> Result<Json<ApiResponse<AdminReplyResponse>>, ApiError> {
    let id = parse_id(&id, "reply")?;
    let reply = ContentService::new(&state.db)
        .update_reply(Some(&identity), id, &req.content)
        .await?;

    Ok(Json(
        ApiResponse::new(AdminReplyResponse::from(reply))
            .with_message("Admin reply updated successfully"),
    ))
}

/// DELETE /api/v1/admin/reply/:id - Delete a reply (owning admin).
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "reply")?;
    ModerationService::new(&state.db)
        .delete_reply(Some(&identity), id)
        .await?;

    Ok(Json(ApiResponse::message("Admin reply deleted successfully")))
}

// ============================================================================
// Moderation
// ============================================================================

/// GET /api/v1/admin/moderation/posts - Every post, enabled or not (admin).
pub async fn moderation_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref(), &state.feed);
    let threads = ModerationService::new(&state.db)
        .moderation_posts(Some(&identity), page)
        .await?;

    Ok(Json(ApiResponse::paginated(threads, PostResponse::from)))
}
