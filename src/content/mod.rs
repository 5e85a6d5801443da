//! Content store for plaza.
//!
//! Posts, comments on posts, and official admin replies, together with
//! their like sets and the ordered child id lists kept on each post.

mod comment_repository;
mod post_repository;
mod reply_repository;
mod service;
mod types;

pub use comment_repository::CommentRepository;
pub use post_repository::PostRepository;
pub use reply_repository::ReplyRepository;
pub use service::ContentService;
pub use types::{
    validate_content, AdminReply, Comment, ContentKind, NewAdminReply, NewComment, NewPost, Page,
    PageRequest, Post, PostThread, MAX_COMMENT_LENGTH, MAX_POST_LENGTH, MAX_REPLY_LENGTH,
};
