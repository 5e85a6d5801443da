//! Admin reply repository for plaza.
//!
//! Replies carry no name snapshot; the author's current name is joined from
//! `users` on every read.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::types::{AdminReply, NewAdminReply};
use crate::db::DbPool;
use crate::Result;

const REPLY_SELECT: &str = "SELECT r.id, r.post_id, r.author_id, u.name AS author_name, r.content,
                                   r.is_official, r.is_enabled, r.created_at, r.updated_at
                            FROM admin_replies r
                            LEFT JOIN users u ON u.id = r.author_id";

#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    author_name: Option<String>,
    content: String,
    is_official: bool,
    is_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReplyRow> for AdminReply {
    fn from(row: ReplyRow) -> Self {
        AdminReply {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            author_name: row.author_name,
            content: row.content,
            is_official: row.is_official,
            enabled: row.is_enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for admin reply records.
pub struct ReplyRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a reply and append it to the parent's reply list.
    ///
    /// Returns `None` when the parent post does not exist.
    pub async fn insert_for_post(
        conn: &mut SqliteConnection,
        new_reply: &NewAdminReply,
    ) -> Result<Option<i64>> {
        let now = Utc::now();
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO admin_replies (post_id, author_id, content, is_official, created_at, updated_at)
             SELECT ?1, ?2, ?3, 1, ?4, ?4
             WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?1)
             RETURNING id",
        )
        .bind(new_reply.post_id)
        .bind(new_reply.author_id)
        .bind(&new_reply.content)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(id) = id else {
            return Ok(None);
        };

        sqlx::query("INSERT INTO post_reply_refs (post_id, reply_id) VALUES (?, ?)")
            .bind(new_reply.post_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(Some(id))
    }

    /// Find a reply by ID, enabled or not.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdminReply>> {
        let row: Option<ReplyRow> = sqlx::query_as(&format!("{REPLY_SELECT} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(AdminReply::from))
    }

    /// Replace the content of a reply and refresh `updated_at`.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Option<AdminReply>> {
        let result =
            sqlx::query("UPDATE admin_replies SET content = ?, updated_at = ? WHERE id = ?")
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

    /// All replies of a post, newest first.
    pub async fn list_by_post(&self, post_id: i64, enabled_only: bool) -> Result<Vec<AdminReply>> {
        let filter = if enabled_only { "AND r.is_enabled = 1" } else { "" };
        let rows: Vec<ReplyRow> = sqlx::query_as(&format!(
            "{REPLY_SELECT}
             WHERE r.post_id = ? {filter}
             ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AdminReply::from).collect())
    }
}
