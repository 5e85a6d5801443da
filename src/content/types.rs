//! Content types for plaza: posts, comments and admin replies.

use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::db::Role;
use crate::{PlazaError, Result};

/// Maximum length for post content (in characters).
pub const MAX_POST_LENGTH: usize = 5000;

/// Maximum length for comment content (in characters).
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Maximum length for admin reply content (in characters).
pub const MAX_REPLY_LENGTH: usize = 3000;

/// The kinds of user-authored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Comment,
    AdminReply,
}

impl ContentKind {
    /// Maximum content length in characters.
    pub fn max_len(&self) -> usize {
        match self {
            ContentKind::Post => MAX_POST_LENGTH,
            ContentKind::Comment => MAX_COMMENT_LENGTH,
            ContentKind::AdminReply => MAX_REPLY_LENGTH,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ContentKind::Post => "Post",
            ContentKind::Comment => "Comment",
            ContentKind::AdminReply => "Reply",
        }
    }

    /// Resource name used in not-found errors.
    pub fn resource(&self) -> &'static str {
        match self {
            ContentKind::Post => "Post",
            ContentKind::Comment => "Comment",
            ContentKind::AdminReply => "Admin reply",
        }
    }

    /// Not-found error for this kind.
    pub fn not_found(&self) -> PlazaError {
        PlazaError::NotFound(self.resource().to_string())
    }
}

/// Validate content and return it trimmed.
///
/// Content must be non-empty after trimming and at most `kind.max_len()`
/// characters.
pub fn validate_content(kind: ContentKind, content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(PlazaError::Validation(format!(
            "{} content cannot be empty",
            kind.label()
        )));
    }
    if trimmed.chars().count() > kind.max_len() {
        return Err(PlazaError::Validation(format!(
            "{} content cannot exceed {} characters",
            kind.label(),
            kind.max_len()
        )));
    }
    Ok(trimmed.to_string())
}

/// A top-level post.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    /// Author name snapshot taken at creation.
    pub author_name: String,
    /// Author role snapshot taken at creation.
    pub author_role: Role,
    pub content: String,
    pub likes: i64,
    /// Users who liked the post, in like order.
    pub liked_by: Vec<i64>,
    /// Child comment ids, in creation order.
    pub comment_ids: Vec<i64>,
    /// Child admin reply ids, in creation order.
    pub admin_reply_ids: Vec<i64>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check if `user_id` has liked this post.
    pub fn is_liked_by(&self, user_id: i64) -> bool {
        self.liked_by.contains(&user_id)
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub author_name: String,
    pub author_role: Role,
    pub content: String,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    /// Author name snapshot taken at creation.
    pub author_name: String,
    pub content: String,
    pub likes: i64,
    pub liked_by: Vec<i64>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Check if `user_id` has liked this comment.
    pub fn is_liked_by(&self, user_id: i64) -> bool {
        self.liked_by.contains(&user_id)
    }
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
}

/// An official reply by an administrator.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminReply {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    /// Current name of the author (joined at read time).
    pub author_name: Option<String>,
    pub content: String,
    pub is_official: bool,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new admin reply.
#[derive(Debug, Clone)]
pub struct NewAdminReply {
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
}

/// A post with its enabled comments and admin replies, newest first.
#[derive(Debug, Clone)]
pub struct PostThread {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub admin_replies: Vec<AdminReply>,
}

/// Page request for listings (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Create a page request, clamping `limit` into `1..=max_limit`.
    pub fn new(page: i64, limit: i64, max_limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Build a page request from raw query values.
    ///
    /// Missing, unparseable or non-positive values fall back to page 1 and
    /// the configured default page size.
    pub fn from_query(page: Option<&str>, limit: Option<&str>, feed: &FeedConfig) -> Self {
        let parse = |v: Option<&str>| {
            v.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
        };
        Self::new(
            parse(page).unwrap_or(1),
            parse(limit).unwrap_or(i64::from(feed.default_page_size)),
            i64::from(feed.max_page_size),
        )
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Result of a paginated query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total number of items (across all pages).
    pub total: i64,
    /// The request that produced this page.
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Total number of pages.
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + self.request.limit - 1) / self.request.limit
        }
    }
}
