//! Comment repository for plaza.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::types::{Comment, NewComment, Page, PageRequest};
use crate::db::DbPool;
use crate::Result;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, author_name, content, likes,
                               is_enabled, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    author_name: String,
    content: String,
    likes: i64,
    is_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            author_id: self.author_id,
            author_name: self.author_name,
            content: self.content,
            likes: self.likes,
            liked_by: Vec::new(),
            enabled: self.is_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for comment records.
pub struct CommentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a comment and append it to the parent's comment list.
    ///
    /// Runs on the caller's connection so it can be part of a transaction.
    /// The first statement is a write. Returns `None` when the parent post
    /// does not exist; nothing is written in that case.
    pub async fn insert_for_post(
        conn: &mut SqliteConnection,
        new_comment: &NewComment,
    ) -> Result<Option<i64>> {
        let now = Utc::now();
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO comments (post_id, author_id, author_name, content, created_at, updated_at)
             SELECT ?1, ?2, ?3, ?4, ?5, ?5
             WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?1)
             RETURNING id",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.author_id)
        .bind(&new_comment.author_name)
        .bind(&new_comment.content)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(id) = id else {
            return Ok(None);
        };

        sqlx::query("INSERT INTO post_comment_refs (post_id, comment_id) VALUES (?, ?)")
            .bind(new_comment.post_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(Some(id))
    }

    /// Find a comment by ID, enabled or not.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row: Option<CommentRow> =
            sqlx::query_as(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Replace the content of a comment and refresh `updated_at`.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Option<Comment>> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
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

    /// All comments of a post, newest first.
    pub async fn list_by_post(&self, post_id: i64, enabled_only: bool) -> Result<Vec<Comment>> {
        let filter = if enabled_only { "AND is_enabled = 1" } else { "" };
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE post_id = ? {filter}
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// One page of a post's enabled comments, newest first.
    pub async fn page_by_post(&self, post_id: i64, page: PageRequest) -> Result<Page<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE post_id = ? AND is_enabled = 1
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE post_id = ? AND is_enabled = 1",
        )
        .bind(post_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Page {
            items: self.hydrate_all(rows).await?,
            total,
            request: page,
        })
    }

    async fn hydrate_all(&self, rows: Vec<CommentRow>) -> Result<Vec<Comment>> {
        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            comments.push(self.hydrate(row).await?);
        }
        Ok(comments)
    }

    async fn hydrate(&self, row: CommentRow) -> Result<Comment> {
        let mut comment = row.into_comment();
        comment.liked_by = sqlx::query_scalar(
            "SELECT user_id FROM comment_likes WHERE comment_id = ? ORDER BY rowid",
        )
        .bind(comment.id)
        .fetch_all(self.pool)
        .await?;
        Ok(comment)
    }
}
