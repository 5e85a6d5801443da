//! Cascading removal of posts and their children.
//!
//! Removing a post is a sequence of steps, each its own transaction. Every
//! step only deletes what is still there, so re-running the whole sequence
//! after a partial failure finishes the job. The last step deletes the post
//! row and sweeps its children again in one transaction.

use tracing::{debug, info};

use crate::db::Database;
use crate::Result;

/// What a post removal deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub comments_removed: u64,
    pub replies_removed: u64,
    pub post_removed: bool,
}

/// Applies removal side effects to keep post/child references consistent.
pub struct CascadeEngine<'a> {
    db: &'a Database,
}

impl<'a> CascadeEngine<'a> {
    /// Create a new CascadeEngine with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Remove a post with all its comments and admin replies.
    pub async fn remove_post(&self, post_id: i64) -> Result<CascadeReport> {
        let mut comments_removed = self.remove_comments_of(post_id).await?;
        let mut replies_removed = self.remove_replies_of(post_id).await?;

        let (post_removed, late_comments, late_replies) = self.remove_post_row(post_id).await?;
        comments_removed += late_comments;
        replies_removed += late_replies;

        let report = CascadeReport {
            comments_removed,
            replies_removed,
            post_removed,
        };

        info!(
            post_id,
            comments_removed = report.comments_removed,
            replies_removed = report.replies_removed,
            post_removed = report.post_removed,
            "Post removed"
        );

        Ok(report)
    }

    /// Step 3: the post row, then any children created after steps 1 and 2.
    ///
    /// Child inserts require the post row to exist, so once this commits no
    /// new child can reference the post.
    async fn remove_post_row(&self, post_id: i64) -> Result<(bool, u64, u64)> {
        let mut tx = self.db.begin().await?;

        // post_likes and the reference rows go with the post.
        let post = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        let comments = sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        let replies = sqlx::query("DELETE FROM admin_replies WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((
            post.rows_affected() > 0,
            comments.rows_affected(),
            replies.rows_affected(),
        ))
    }

    /// Step 1: every comment whose `post_id` is the post.
    async fn remove_comments_of(&self, post_id: i64) -> Result<u64> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM post_comment_refs WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Step 2: every admin reply whose `post_id` is the post.
    async fn remove_replies_of(&self, post_id: i64) -> Result<u64> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM post_reply_refs WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM admin_replies WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Remove a comment and its entry in the parent's comment list.
    ///
    /// A missing parent only skips the list update. Returns whether the
    /// comment existed.
    pub async fn remove_comment(&self, comment_id: i64) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let unlinked = sqlx::query("DELETE FROM post_comment_refs WHERE comment_id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
        if unlinked.rows_affected() == 0 {
            debug!(comment_id, "Comment has no parent reference, skipping unlink");
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        info!(comment_id, removed, "Comment removed");
        Ok(removed)
    }

    /// Remove an admin reply and its entry in the parent's reply list.
    pub async fn remove_reply(&self, reply_id: i64) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let unlinked = sqlx::query("DELETE FROM post_reply_refs WHERE reply_id = ?")
            .bind(reply_id)
            .execute(&mut *tx)
            .await?;
        if unlinked.rows_affected() == 0 {
            debug!(reply_id, "Reply has no parent reference, skipping unlink");
        }

        let result = sqlx::query("DELETE FROM admin_replies WHERE id = ?")
            .bind(reply_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        info!(reply_id, removed, "Admin reply removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        CommentRepository, NewAdminReply, NewComment, NewPost, PostRepository, ReplyRepository,
    };
    use crate::db::{NewUser, Role, UserRepository};

    struct Fixture {
        db: Database,
        user_id: i64,
        post_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("Alice", "alice@example.com", "hash").with_role(Role::Admin))
            .await
            .unwrap();
        let post = PostRepository::new(db.pool())
            .create(&NewPost {
                author_id: user.id,
                author_name: user.name.clone(),
                author_role: user.role,
                content: "parent".to_string(),
            })
            .await
            .unwrap();
        Fixture {
            db,
            user_id: user.id,
            post_id: post.id,
        }
    }

    async fn add_comment(f: &Fixture) -> i64 {
        let mut tx = f.db.begin().await.unwrap();
        let id = CommentRepository::insert_for_post(
            &mut tx,
            &NewComment {
                post_id: f.post_id,
                author_id: f.user_id,
                author_name: "Alice".to_string(),
                content: "comment".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
        tx.commit().await.unwrap();
        id
    }

    async fn add_reply(f: &Fixture) -> i64 {
        let mut tx = f.db.begin().await.unwrap();
        let id = ReplyRepository::insert_for_post(
            &mut tx,
            &NewAdminReply {
                post_id: f.post_id,
                author_id: f.user_id,
                content: "reply".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
        tx.commit().await.unwrap();
        id
    }

    async fn count(db: &Database, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(db.pool()).await.unwrap()
    }

    #[tokio::test]
    async fn test_remove_post_cascades() {
        let f = fixture().await;
        add_comment(&f).await;
        add_comment(&f).await;
        add_reply(&f).await;

        let engine = CascadeEngine::new(&f.db);
        let report = engine.remove_post(f.post_id).await.unwrap();

        assert_eq!(
            report,
            CascadeReport {
                comments_removed: 2,
                replies_removed: 1,
                post_removed: true,
            }
        );
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM comments").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM admin_replies").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM posts").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM post_comment_refs").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM post_reply_refs").await, 0);
    }

    #[tokio::test]
    async fn test_remove_post_is_idempotent() {
        let f = fixture().await;
        add_comment(&f).await;

        let engine = CascadeEngine::new(&f.db);
        engine.remove_post(f.post_id).await.unwrap();
        let again = engine.remove_post(f.post_id).await.unwrap();
        assert_eq!(again, CascadeReport::default());
    }

    #[tokio::test]
    async fn test_remove_post_finishes_partial_cascade() {
        let f = fixture().await;
        add_comment(&f).await;
        add_reply(&f).await;

        // Simulate a run that stopped after step 1.
        let engine = CascadeEngine::new(&f.db);
        engine.remove_comments_of(f.post_id).await.unwrap();

        let report = engine.remove_post(f.post_id).await.unwrap();
        assert_eq!(report.comments_removed, 0);
        assert_eq!(report.replies_removed, 1);
        assert!(report.post_removed);
    }

    #[tokio::test]
    async fn test_remove_post_sweeps_children_added_mid_cascade() {
        let f = fixture().await;
        add_comment(&f).await;

        let engine = CascadeEngine::new(&f.db);
        engine.remove_comments_of(f.post_id).await.unwrap();
        engine.remove_replies_of(f.post_id).await.unwrap();

        // Children created after the first two steps ran.
        add_comment(&f).await;
        add_reply(&f).await;

        let (post_removed, comments, replies) = engine.remove_post_row(f.post_id).await.unwrap();
        assert!(post_removed);
        assert_eq!((comments, replies), (1, 1));
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM comments").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM admin_replies").await, 0);

        // With the post row gone, inserts are refused.
        let mut tx = f.db.begin().await.unwrap();
        let refused = CommentRepository::insert_for_post(
            &mut tx,
            &NewComment {
                post_id: f.post_id,
                author_id: f.user_id,
                author_name: "Alice".to_string(),
                content: "too late".to_string(),
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        assert!(refused.is_none());
    }

    #[tokio::test]
    async fn test_remove_comment_unlinks_parent() {
        let f = fixture().await;
        let keep = add_comment(&f).await;
        let gone = add_comment(&f).await;

        let engine = CascadeEngine::new(&f.db);
        assert!(engine.remove_comment(gone).await.unwrap());
        assert!(!engine.remove_comment(gone).await.unwrap());

        let post = PostRepository::new(f.db.pool())
            .find_by_id(f.post_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.comment_ids, vec![keep]);
    }

    #[tokio::test]
    async fn test_remove_child_of_missing_parent() {
        let f = fixture().await;
        let comment = add_comment(&f).await;
        let reply = add_reply(&f).await;

        // Parent vanishes without the cascade (reference rows go with it).
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(f.post_id)
            .execute(f.db.pool())
            .await
            .unwrap();

        let engine = CascadeEngine::new(&f.db);
        assert!(engine.remove_comment(comment).await.unwrap());
        assert!(engine.remove_reply(reply).await.unwrap());
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM comments").await, 0);
        assert_eq!(count(&f.db, "SELECT COUNT(*) FROM admin_replies").await, 0);
    }
}
