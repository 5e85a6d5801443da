//! Moderation for plaza.
//!
//! Authorized removal and like toggling, plus the admin moderation listing.
//! The referential side effects live in [`CascadeEngine`] and
//! [`toggle_like`].

mod cascade;
mod likes;

pub use cascade::{CascadeEngine, CascadeReport};
pub use likes::{toggle_like, LikeOutcome, LikeTarget};

use crate::auth::{require, require_actor, Identity, Operation};
use crate::content::{
    Comment, CommentRepository, ContentKind, ContentService, Page, PageRequest, Post,
    PostRepository, PostThread, ReplyRepository,
};
use crate::db::Database;
use crate::Result;

/// Service for removal, likes and moderation with authorization.
pub struct ModerationService<'a> {
    db: &'a Database,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Delete a post with its comments and replies. Owner or admin.
    pub async fn delete_post(&self, actor: Option<&Identity>, post_id: i64) -> Result<CascadeReport> {
        let op = Operation::DeletePost;
        let actor = require_actor(actor, op)?;

        let post = PostRepository::new(self.db.pool())
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ContentKind::Post.not_found())?;
        require(Some(actor), op, Some(post.author_id))?;

        CascadeEngine::new(self.db).remove_post(post_id).await
    }

    /// Delete a comment. Owner or admin.
    pub async fn delete_comment(&self, actor: Option<&Identity>, comment_id: i64) -> Result<()> {
        let op = Operation::DeleteComment;
        let actor = require_actor(actor, op)?;

        let comment = CommentRepository::new(self.db.pool())
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ContentKind::Comment.not_found())?;
        require(Some(actor), op, Some(comment.author_id))?;

        CascadeEngine::new(self.db).remove_comment(comment_id).await?;
        Ok(())
    }

    /// Delete an admin reply. Owning admin only.
    pub async fn delete_reply(&self, actor: Option<&Identity>, reply_id: i64) -> Result<()> {
        let op = Operation::DeleteAdminReply;
        let actor = require_actor(actor, op)?;

        let reply = ReplyRepository::new(self.db.pool())
            .find_by_id(reply_id)
            .await?
            .ok_or_else(|| ContentKind::AdminReply.not_found())?;
        require(Some(actor), op, Some(reply.author_id))?;

        CascadeEngine::new(self.db).remove_reply(reply_id).await?;
        Ok(())
    }

    /// Toggle the actor's like on a post.
    pub async fn like_post(&self, actor: Option<&Identity>, post_id: i64) -> Result<(LikeOutcome, Post)> {
        let actor = require_actor(actor, Operation::LikePost)?;
        let outcome = toggle_like(self.db, LikeTarget::Post, post_id, actor.id).await?;

        let post = PostRepository::new(self.db.pool())
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ContentKind::Post.not_found())?;
        Ok((outcome, post))
    }

    /// Toggle the actor's like on a comment.
    pub async fn like_comment(
        &self,
        actor: Option<&Identity>,
        comment_id: i64,
    ) -> Result<(LikeOutcome, Comment)> {
        let actor = require_actor(actor, Operation::LikeComment)?;
        let outcome = toggle_like(self.db, LikeTarget::Comment, comment_id, actor.id).await?;

        let comment = CommentRepository::new(self.db.pool())
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ContentKind::Comment.not_found())?;
        Ok((outcome, comment))
    }

    /// Every post, enabled or not, with all children. Admin only.
    pub async fn moderation_posts(
        &self,
        actor: Option<&Identity>,
        page: PageRequest,
    ) -> Result<Page<PostThread>> {
        require_actor(actor, Operation::ModeratePosts)?;
        ContentService::new(self.db).list_threads(page, false).await
    }
}
