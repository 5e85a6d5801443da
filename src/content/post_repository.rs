//! Post repository for plaza.
//!
//! CRUD and listing for posts, including the like set and the ordered child
//! id lists stored beside each post.

use chrono::{DateTime, Utc};

use super::types::{NewPost, Page, PageRequest, Post};
use crate::db::{DbPool, Role};
use crate::{PlazaError, Result};

const POST_COLUMNS: &str = "id, author_id, author_name, author_role, content, likes,
                            is_enabled, created_at, updated_at";

/// Raw `posts` row, before the like set and child ids are attached.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    author_name: String,
    author_role: String,
    content: String,
    likes: i64,
    is_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            author_name: self.author_name,
            author_role: self.author_role.parse().unwrap_or(Role::User),
            content: self.content,
            likes: self.likes,
            liked_by: Vec::new(),
            comment_ids: Vec::new(),
            admin_reply_ids: Vec::new(),
            enabled: self.is_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for post records.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (author_id, author_name, author_role, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_post.author_id)
        .bind(&new_post.author_name)
        .bind(new_post.author_role.as_str())
        .bind(&new_post.content)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| PlazaError::NotFound("Post".to_string()))
    }

    /// Find a post by ID, enabled or not.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Check whether a post exists.
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Replace the content of a post and refresh `updated_at`.
    ///
    /// Returns `None` if the post does not exist.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Option<Post>> {
        let result = sqlx::query("UPDATE posts SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// List posts, newest first.
    ///
    /// With `enabled_only` disabled posts are skipped and not counted.
    pub async fn list(&self, page: PageRequest, enabled_only: bool) -> Result<Page<Post>> {
        let filter = if enabled_only { "WHERE is_enabled = 1" } else { "" };

        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts {filter}
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts {filter}"))
            .fetch_one(self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.hydrate(row).await?);
        }

        Ok(Page {
            items,
            total,
            request: page,
        })
    }

    async fn hydrate(&self, row: PostRow) -> Result<Post> {
        let mut post = row.into_post();

        post.liked_by =
            sqlx::query_scalar("SELECT user_id FROM post_likes WHERE post_id = ? ORDER BY rowid")
                .bind(post.id)
                .fetch_all(self.pool)
                .await?;

        post.comment_ids = sqlx::query_scalar(
            "SELECT comment_id FROM post_comment_refs WHERE post_id = ? ORDER BY position",
        )
        .bind(post.id)
        .fetch_all(self.pool)
        .await?;

        post.admin_reply_ids = sqlx::query_scalar(
            "SELECT reply_id FROM post_reply_refs WHERE post_id = ? ORDER BY position",
        )
        .bind(post.id)
        .fetch_all(self.pool)
        .await?;

        Ok(post)
    }
}
