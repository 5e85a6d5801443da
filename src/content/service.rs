//! Content service for plaza.
//!
//! High-level post, comment and admin reply operations. Every mutation runs
//! the same sequence: target-independent authorization, content validation,
//! target lookup, ownership authorization, then the write.

use tracing::info;

use crate::auth::{require, require_actor, Identity, Operation};
use crate::db::{Database, User, UserRepository};
use crate::{PlazaError, Result};

use super::comment_repository::CommentRepository;
use super::post_repository::PostRepository;
use super::reply_repository::ReplyRepository;
use super::types::{
    validate_content, AdminReply, Comment, ContentKind, NewAdminReply, NewComment, NewPost, Page,
    PageRequest, Post, PostThread,
};

/// Service for content operations with authorization.
pub struct ContentService<'a> {
    db: &'a Database,
}

impl<'a> ContentService<'a> {
    /// Create a new ContentService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    async fn author(&self, actor: &Identity) -> Result<User> {
        UserRepository::new(self.db.pool())
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| PlazaError::NotFound("User".to_string()))
    }

    // ========== Posts ==========

    /// Create a post. Author name and role are snapshotted from the user record.
    pub async fn create_post(&self, actor: Option<&Identity>, content: &str) -> Result<Post> {
        let actor = require_actor(actor, Operation::CreatePost)?;
        let content = validate_content(ContentKind::Post, content)?;
        let author = self.author(actor).await?;

        let post = PostRepository::new(self.db.pool())
            .create(&NewPost {
                author_id: author.id,
                author_name: author.name,
                author_role: author.role,
                content,
            })
            .await?;

        info!(post_id = post.id, user_id = actor.id, "Post created");
        Ok(post)
    }

    /// List enabled posts, newest first, with their enabled children.
    pub async fn list_posts(&self, page: PageRequest) -> Result<Page<PostThread>> {
        self.list_threads(page, true).await
    }

    /// List posts with their children.
    pub(crate) async fn list_threads(
        &self,
        page: PageRequest,
        enabled_only: bool,
    ) -> Result<Page<PostThread>> {
        let posts = PostRepository::new(self.db.pool())
            .list(page, enabled_only)
            .await?;

        let mut items = Vec::with_capacity(posts.items.len());
        for post in posts.items {
            items.push(self.thread_of(post, enabled_only).await?);
        }

        Ok(Page {
            items,
            total: posts.total,
            request: posts.request,
        })
    }

    /// Get an enabled post with its enabled children.
    pub async fn get_post(&self, post_id: i64) -> Result<PostThread> {
        let post = PostRepository::new(self.db.pool())
            .find_by_id(post_id)
            .await?
            .filter(|p| p.enabled)
            .ok_or_else(|| ContentKind::Post.not_found())?;

        self.thread_of(post, true).await
    }

    /// Replace a post's content. Owner only.
    pub async fn update_post(
        &self,
        actor: Option<&Identity>,
        post_id: i64,
        content: &str,
    ) -> Result<Post> {
        let op = Operation::UpdatePost;
        let actor = require_actor(actor, op)?;
        let content = validate_content(ContentKind::Post, content)?;

        let repo = PostRepository::new(self.db.pool());
        let post = repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ContentKind::Post.not_found())?;
        require(Some(actor), op, Some(post.author_id))?;

        let updated = repo
            .update_content(post_id, &content)
            .await?
            .ok_or_else(|| ContentKind::Post.not_found())?;

        info!(post_id, user_id = actor.id, "Post updated");
        Ok(updated)
    }

    async fn thread_of(&self, post: Post, enabled_only: bool) -> Result<PostThread> {
        let comments = CommentRepository::new(self.db.pool())
            .list_by_post(post.id, enabled_only)
            .await?;
        let admin_replies = ReplyRepository::new(self.db.pool())
            .list_by_post(post.id, enabled_only)
            .await?;

        Ok(PostThread {
            post,
            comments,
            admin_replies,
        })
    }

    // ========== Comments ==========

    /// Comment on a post.
    pub async fn create_comment(
        &self,
        actor: Option<&Identity>,
        post_id: i64,
        content: &str,
    ) -> Result<Comment> {
        let actor = require_actor(actor, Operation::CreateComment)?;
        let content = validate_content(ContentKind::Comment, content)?;
        let author = self.author(actor).await?;

        let mut tx = self.db.begin().await?;
        let comment_id = CommentRepository::insert_for_post(
            &mut tx,
            &NewComment {
                post_id,
                author_id: author.id,
                author_name: author.name,
                content,
            },
        )
        .await?
        .ok_or_else(|| ContentKind::Post.not_found())?;
        tx.commit().await?;

        info!(comment_id, post_id, user_id = actor.id, "Comment created");

        CommentRepository::new(self.db.pool())
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ContentKind::Comment.not_found())
    }

    /// One page of a post's enabled comments, newest first.
    pub async fn list_comments(&self, post_id: i64, page: PageRequest) -> Result<Page<Comment>> {
        if !PostRepository::new(self.db.pool()).exists(post_id).await? {
            return Err(ContentKind::Post.not_found());
        }
        CommentRepository::new(self.db.pool())
            .page_by_post(post_id, page)
            .await
    }

    /// Replace a comment's content. Owner only.
    pub async fn update_comment(
        &self,
        actor: Option<&Identity>,
        comment_id: i64,
        content: &str,
    ) -> Result<Comment> {
        let op = Operation::UpdateComment;
        let actor = require_actor(actor, op)?;
        let content = validate_content(ContentKind::Comment, content)?;

        let repo = CommentRepository::new(self.db.pool());
        let comment = repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ContentKind::Comment.not_found())?;
        require(Some(actor), op, Some(comment.author_id))?;

        let updated = repo
            .update_content(comment_id, &content)
            .await?
            .ok_or_else(|| ContentKind::Comment.not_found())?;

        info!(comment_id, user_id = actor.id, "Comment updated");
        Ok(updated)
    }

    // ========== Admin replies ==========

    /// Post an official reply. Admin only.
    pub async fn create_reply(
        &self,
        actor: Option<&Identity>,
        post_id: i64,
        content: &str,
    ) -> Result<AdminReply> {
        let actor = require_actor(actor, Operation::CreateAdminReply)?;
        let content = validate_content(ContentKind::AdminReply, content)?;
        let author = self.author(actor).await?;

        let mut tx = self.db.begin().await?;
        let reply_id = ReplyRepository::insert_for_post(
            &mut tx,
            &NewAdminReply {
                post_id,
                author_id: author.id,
                content,
            },
        )
        .await?
        .ok_or_else(|| ContentKind::Post.not_found())?;
        tx.commit().await?;

        info!(reply_id, post_id, user_id = actor.id, "Admin reply created");

        ReplyRepository::new(self.db.pool())
            .find_by_id(reply_id)
            .await?
            .ok_or_else(|| ContentKind::AdminReply.not_found())
    }

    /// All enabled replies of a post, newest first.
    pub async fn list_replies(&self, post_id: i64) -> Result<Vec<AdminReply>> {
        if !PostRepository::new(self.db.pool()).exists(post_id).await? {
            return Err(ContentKind::Post.not_found());
        }
        ReplyRepository::new(self.db.pool())
            .list_by_post(post_id, true)
            .await
    }

    /// Replace a reply's content. Owning admin only.
    pub async fn update_reply(
        &self,
        actor: Option<&Identity>,
        reply_id: i64,
        content: &str,
    ) -> Result<AdminReply> {
        let op = Operation::UpdateAdminReply;
        let actor = require_actor(actor, op)?;
        let content = validate_content(ContentKind::AdminReply, content)?;

        let repo = ReplyRepository::new(self.db.pool());
        let reply = repo
            .find_by_id(reply_id)
            .await?
            .ok_or_else(|| ContentKind::AdminReply.not_found())?;
        require(Some(actor), op, Some(reply.author_id))?;

        let updated = repo
            .update_content(reply_id, &content)
            .await?
            .ok_or_else(|| ContentKind::AdminReply.not_found())?;

        info!(reply_id, user_id = actor.id, "Admin reply updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, Role};

    async fn setup() -> (Database, Identity, Identity, Identity) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let alice = repo
            .create(&NewUser::new("Alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        let bob = repo
            .create(&NewUser::new("Bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        let admin = repo
            .create(&NewUser::new("Root", "root@example.com", "hash").with_role(Role::Admin))
            .await
            .unwrap();
        (
            db,
            Identity::from(&alice),
            Identity::from(&bob),
            Identity::from(&admin),
        )
    }

    #[tokio::test]
    async fn test_create_post_snapshots_author() {
        let (db, alice, _, _) = setup().await;
        let service = ContentService::new(&db);

        let post = service.create_post(Some(&alice), "  Hello plaza  ").await.unwrap();
        assert_eq!(post.content, "Hello plaza");
        assert_eq!(post.author_id, alice.id);
        assert_eq!(post.author_name, "Alice");
        assert_eq!(post.author_role, Role::User);
    }

    #[tokio::test]
    async fn test_create_post_requires_identity_and_content() {
        let (db, alice, _, _) = setup().await;
        let service = ContentService::new(&db);

        assert!(matches!(
            service.create_post(None, "hello").await,
            Err(PlazaError::Auth(_))
        ));
        assert!(matches!(
            service.create_post(Some(&alice), "   ").await,
            Err(PlazaError::Validation(_))
        ));
        assert!(matches!(
            service.create_post(Some(&alice), &"x".repeat(5001)).await,
            Err(PlazaError::Validation(_))
        ));
        let posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(posts, 0);
    }

    #[tokio::test]
    async fn test_update_post_owner_only() {
        let (db, alice, bob, admin) = setup().await;
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "original").await.unwrap();

        for intruder in [&bob, &admin] {
            let result = service.update_post(Some(intruder), post.id, "hijacked").await;
            assert!(matches!(result, Err(PlazaError::Permission(_))));
        }
        let unchanged = service.get_post(post.id).await.unwrap();
        assert_eq!(unchanged.post.content, "original");

        let updated = service.update_post(Some(&alice), post.id, "edited").await.unwrap();
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.author_id, alice.id);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let (db, alice, _, _) = setup().await;
        let service = ContentService::new(&db);

        let result = service.update_post(Some(&alice), 999, "").await;
        assert!(matches!(result, Err(PlazaError::Validation(_))));

        let result = service.update_post(Some(&alice), 999, "text").await;
        assert!(matches!(result, Err(PlazaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let (db, alice, bob, _) = setup().await;
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "parent").await.unwrap();

        let comment = service
            .create_comment(Some(&bob), post.id, " nice ")
            .await
            .unwrap();
        assert_eq!(comment.content, "nice");
        assert_eq!(comment.author_name, "Bob");
        assert_eq!(comment.post_id, post.id);

        let result = service.update_comment(Some(&alice), comment.id, "edited").await;
        assert!(matches!(result, Err(PlazaError::Permission(_))));

        let updated = service
            .update_comment(Some(&bob), comment.id, "edited")
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");

        let page = service
            .list_comments(post.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let thread = service.get_post(post.id).await.unwrap();
        assert_eq!(thread.post.comment_ids, vec![comment.id]);
        assert_eq!(thread.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let (db, alice, _, _) = setup().await;
        let service = ContentService::new(&db);

        let result = service.create_comment(Some(&alice), 999, "hello").await;
        assert!(matches!(result, Err(PlazaError::NotFound(r)) if r == "Post"));

        let result = service.list_comments(999, PageRequest::default()).await;
        assert!(matches!(result, Err(PlazaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reply_requires_admin() {
        let (db, alice, _, admin) = setup().await;
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "question").await.unwrap();

        let result = service.create_reply(Some(&alice), post.id, "fake official").await;
        assert!(matches!(result, Err(PlazaError::Permission(_))));
        assert!(service.list_replies(post.id).await.unwrap().is_empty());

        let reply = service
            .create_reply(Some(&admin), post.id, "official answer")
            .await
            .unwrap();
        assert!(reply.is_official);
        assert_eq!(reply.author_name.as_deref(), Some("Root"));

        let replies = service.list_replies(post.id).await.unwrap();
        assert_eq!(replies.len(), 1);
    }

    #[tokio::test]
    async fn test_reply_update_owner_only() {
        let (db, alice, _, admin) = setup().await;
        let second_admin = {
            let user = UserRepository::new(db.pool())
                .create(&NewUser::new("Ops", "ops@example.com", "hash").with_role(Role::Admin))
                .await
                .unwrap();
            Identity::from(&user)
        };
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "question").await.unwrap();
        let reply = service
            .create_reply(Some(&admin), post.id, "answer")
            .await
            .unwrap();

        let result = service.update_reply(Some(&second_admin), reply.id, "mine now").await;
        assert!(matches!(result, Err(PlazaError::Permission(_))));

        let updated = service
            .update_reply(Some(&admin), reply.id, "better answer")
            .await
            .unwrap();
        assert_eq!(updated.content, "better answer");
        assert!(updated.updated_at >= reply.updated_at);
    }

    #[tokio::test]
    async fn test_disabled_post_hidden() {
        let (db, alice, _, _) = setup().await;
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "soon hidden").await.unwrap();

        sqlx::query("UPDATE posts SET is_enabled = 0 WHERE id = ?")
            .bind(post.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            service.get_post(post.id).await,
            Err(PlazaError::NotFound(_))
        ));
        let page = service.list_posts(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_thread_children_newest_first() {
        let (db, alice, bob, _) = setup().await;
        let service = ContentService::new(&db);
        let post = service.create_post(Some(&alice), "parent").await.unwrap();

        let first = service.create_comment(Some(&bob), post.id, "first").await.unwrap();
        let second = service.create_comment(Some(&alice), post.id, "second").await.unwrap();

        let page = service.list_posts(PageRequest::default()).await.unwrap();
        let ids: Vec<_> = page.items[0].comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
