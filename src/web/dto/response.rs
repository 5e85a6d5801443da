//! Response DTOs for Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Identity;
use crate::content::{AdminReply, Comment, Page, Post, PostThread};
use crate::db::{Role, User};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Response envelope: `{success, message?, data?, pagination?, count?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` on this path; errors use [`ErrorBody`](crate::web::error::ErrorBody).
    pub success: bool,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata for listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Item count for unpaginated listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            count: None,
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an item count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl<U: Serialize> ApiResponse<Vec<U>> {
    /// Create a paginated response, converting each page item.
    pub fn paginated<I>(page: Page<I>, convert: impl FnMut(I) -> U) -> Self {
        let pagination = Pagination::from_page(&page);
        Self {
            success: true,
            message: None,
            data: Some(page.items.into_iter().map(convert).collect()),
            pagination: Some(pagination),
            count: None,
        }
    }
}

impl ApiResponse<()> {
    /// A response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
            count: None,
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based).
    pub current_page: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Total number of items.
    pub total: i64,
    /// Items per page.
    pub limit: i64,
}

impl Pagination {
    /// Build pagination metadata from a page of results.
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            current_page: page.request.page,
            total_pages: page.total_pages(),
            total: page.total,
            limit: page.request.limit,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Public user information.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Signup/login response data.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer credential.
    pub token: String,
    /// The authenticated user.
    pub user: UserInfo,
}

/// Decoded credential claims.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    /// User ID.
    pub id: i64,
    /// Email carried by the credential.
    pub email: String,
    /// Role carried by the credential.
    pub role: Role,
}

impl From<Identity> for TokenInfo {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            role: identity.role,
        }
    }
}

/// Current user profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Content
// ============================================================================

/// Post response.
///
/// `comments` and `adminReplies` are present when the post is returned as a
/// thread (feed, detail, moderation listing).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_role: Role,
    pub content: String,
    pub likes: i64,
    pub liked_by: Vec<i64>,
    pub comment_ids: Vec<i64>,
    pub admin_reply_ids: Vec<i64>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_replies: Option<Vec<AdminReplyResponse>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author_name: post.author_name,
            author_role: post.author_role,
            content: post.content,
            likes: post.likes,
            liked_by: post.liked_by,
            comment_ids: post.comment_ids,
            admin_reply_ids: post.admin_reply_ids,
            enabled: post.enabled,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments: None,
            admin_replies: None,
        }
    }
}

impl From<PostThread> for PostResponse {
    fn from(thread: PostThread) -> Self {
        let mut response = PostResponse::from(thread.post);
        response.comments = Some(thread.comments.into_iter().map(Into::into).collect());
        response.admin_replies = Some(thread.admin_replies.into_iter().map(Into::into).collect());
        response
    }
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub likes: i64,
    pub liked_by: Vec<i64>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: comment.author_name,
            content: comment.content,
            likes: comment.likes,
            liked_by: comment.liked_by,
            enabled: comment.enabled,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Admin reply response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReplyResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    /// Current author name; `null` once the account is gone.
    pub author_name: Option<String>,
    pub content: String,
    pub is_official: bool,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminReply> for AdminReplyResponse {
    fn from(reply: AdminReply) -> Self {
        Self {
            id: reply.id,
            post_id: reply.post_id,
            author_id: reply.author_id,
            author_name: reply.author_name,
            content: reply.content,
            is_official: reply.is_official,
            enabled: reply.enabled,
            created_at: reply.created_at,
            updated_at: reply.updated_at,
        }
    }
}

/// Like toggle result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Whether the actor now likes the target.
    pub liked: bool,
    /// Like count after the toggle.
    pub likes: i64,
    /// Users who like the target after the toggle.
    pub liked_by: Vec<i64>,
}
