//! Like toggling for posts and comments.
//!
//! A like is a `(target_id, user_id)` row; the primary key gives set
//! semantics. Each toggle runs in one transaction whose first statement is
//! a write, so toggles on the same target are serialized by SQLite and the
//! stored `likes` counter is always recomputed from the set.

use tracing::debug;

use crate::db::Database;
use crate::{PlazaError, Result};

/// What can be liked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    fn unlike_sql(&self) -> &'static str {
        match self {
            LikeTarget::Post => "DELETE FROM post_likes WHERE post_id = ? AND user_id = ?",
            LikeTarget::Comment => "DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?",
        }
    }

    fn like_sql(&self) -> &'static str {
        match self {
            LikeTarget::Post => {
                "INSERT OR IGNORE INTO post_likes (post_id, user_id)
                 SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?1)"
            }
            LikeTarget::Comment => {
                "INSERT OR IGNORE INTO comment_likes (comment_id, user_id)
                 SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM comments WHERE id = ?1)"
            }
        }
    }

    fn recount_sql(&self) -> &'static str {
        match self {
            LikeTarget::Post => {
                "UPDATE posts SET likes = (SELECT COUNT(*) FROM post_likes WHERE post_id = ?1)
                 WHERE id = ?1 RETURNING likes"
            }
            LikeTarget::Comment => {
                "UPDATE comments SET likes = (SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?1)
                 WHERE id = ?1 RETURNING likes"
            }
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            LikeTarget::Post => "Post",
            LikeTarget::Comment => "Comment",
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether the user likes the target after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub likes: i64,
}

/// Toggle `user_id`'s like on a target.
///
/// Fails with `NotFound` if the target does not exist.
pub async fn toggle_like(
    db: &Database,
    target: LikeTarget,
    target_id: i64,
    user_id: i64,
) -> Result<LikeOutcome> {
    let mut tx = db.begin().await?;

    let removed = sqlx::query(target.unlike_sql())
        .bind(target_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let liked = if removed > 0 {
        false
    } else {
        let added = sqlx::query(target.like_sql())
            .bind(target_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if added == 0 {
            return Err(PlazaError::NotFound(target.resource().to_string()));
        }
        true
    };

    let likes: Option<i64> = sqlx::query_scalar(target.recount_sql())
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;
    let likes = likes.ok_or_else(|| PlazaError::NotFound(target.resource().to_string()))?;

    tx.commit().await?;

    debug!(
        kind = target.resource(),
        target_id,
        user_id,
        liked,
        likes,
        "Like toggled"
    );

    Ok(LikeOutcome { liked, likes })
}
