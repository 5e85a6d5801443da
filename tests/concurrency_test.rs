//! Concurrency tests for plaza.
//!
//! Concurrent like toggles, comment creation and post removal against a
//! file-backed database with a multi-connection pool.

use std::sync::Arc;

use plaza::content::{ContentService, PostRepository};
use plaza::db::{NewUser, Role, UserRepository};
use plaza::{Database, Identity, ModerationService, PlazaError};
use tempfile::TempDir;

/// Open a file-backed database in a temp directory.
async fn setup_test_db() -> (Arc<Database>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path().join("plaza.db"), 8).await.unwrap();
    (Arc::new(db), dir)
}

/// Create users and return their identities.
async fn create_users(db: &Database, count: usize) -> Vec<Identity> {
    let repo = UserRepository::new(db.pool());
    let mut users = Vec::with_capacity(count);
    for i in 0..count {
        let user = repo
            .create(&NewUser::new(
                format!("user{}", i),
                format!("user{}@example.com", i),
                "hash",
            ))
            .await
            .unwrap();
        users.push(Identity::from(&user));
    }
    users
}

/// Concurrent likes from different users are all counted.
#[tokio::test]
async fn test_concurrent_likes_by_different_users() {
    let (db, _dir) = setup_test_db().await;
    let users = create_users(&db, 10).await;
    let post_id = ContentService::new(&db)
        .create_post(Some(&users[0]), "popular")
        .await
        .unwrap()
        .id;

    let mut handles = Vec::new();
    for user in users.iter().cloned() {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            ModerationService::new(&db)
                .like_post(Some(&user), post_id)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = PostRepository::new(db.pool())
        .find_by_id(post_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.likes, 10);
    assert_eq!(post.liked_by.len(), 10);
    for user in &users {
        assert!(post.is_liked_by(user.id));
    }
}

/// Concurrent toggles by one user are serialized by set membership.
#[tokio::test]
async fn test_concurrent_toggles_by_same_user() {
    let (db, _dir) = setup_test_db().await;
    let users = create_users(&db, 2).await;
    let post_id = ContentService::new(&db)
        .create_post(Some(&users[0]), "flip")
        .await
        .unwrap()
        .id;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let db = Arc::clone(&db);
        let user = users[1].clone();
        handles.push(tokio::spawn(async move {
            ModerationService::new(&db)
                .like_post(Some(&user), post_id)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = PostRepository::new(db.pool())
        .find_by_id(post_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.likes, post.liked_by.len() as i64);
    assert_eq!(post.likes, 0);
}

/// Concurrent comments all land in the post's comment list.
#[tokio::test]
async fn test_concurrent_comment_creation() {
    let (db, _dir) = setup_test_db().await;
    let users = create_users(&db, 5).await;
    let post_id = ContentService::new(&db)
        .create_post(Some(&users[0]), "discuss")
        .await
        .unwrap()
        .id;

    let mut handles = Vec::new();
    for (i, user) in users.iter().cloned().enumerate() {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            ContentService::new(&db)
                .create_comment(Some(&user), post_id, &format!("comment {}", i))
                .await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    let post = PostRepository::new(db.pool())
        .find_by_id(post_id)
        .await
        .unwrap()
        .unwrap();
    let mut listed = post.comment_ids.clone();
    listed.sort_unstable();
    ids.sort_unstable();
    assert_eq!(listed, ids);
}

/// Count children whose parent post no longer exists.
async fn orphans(db: &Database) -> (i64, i64) {
    let comments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id NOT IN (SELECT id FROM posts)")
            .fetch_one(db.pool())
            .await
            .unwrap();
    let replies: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_replies WHERE post_id NOT IN (SELECT id FROM posts)",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();
    (comments, replies)
}

/// Children created while their post is being removed never outlive it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_post_removal_races_child_creation() {
    let (db, _dir) = setup_test_db().await;
    let users = create_users(&db, 2).await;
    let admin = Identity::from(
        &UserRepository::new(db.pool())
            .create(&NewUser::new("root", "root@example.com", "hash").with_role(Role::Admin))
            .await
            .unwrap(),
    );

    for round in 0..40 {
        let post_id = ContentService::new(&db)
            .create_post(Some(&users[0]), &format!("doomed {}", round))
            .await
            .unwrap()
            .id;

        let remover = {
            let db = Arc::clone(&db);
            let owner = users[0].clone();
            tokio::spawn(async move {
                ModerationService::new(&db)
                    .delete_post(Some(&owner), post_id)
                    .await
            })
        };
        let commenter = {
            let db = Arc::clone(&db);
            let user = users[1].clone();
            tokio::spawn(async move {
                for i in 0..5 {
                    match ContentService::new(&db)
                        .create_comment(Some(&user), post_id, &format!("late {}", i))
                        .await
                    {
                        Ok(_) | Err(PlazaError::NotFound(_)) => {}
                        Err(e) => panic!("unexpected comment error: {}", e),
                    }
                }
            })
        };
        let replier = {
            let db = Arc::clone(&db);
            let admin = admin.clone();
            tokio::spawn(async move {
                for i in 0..3 {
                    match ContentService::new(&db)
                        .create_reply(Some(&admin), post_id, &format!("late reply {}", i))
                        .await
                    {
                        Ok(_) | Err(PlazaError::NotFound(_)) => {}
                        Err(e) => panic!("unexpected reply error: {}", e),
                    }
                }
            })
        };

        let report = remover.await.unwrap().unwrap();
        assert!(report.post_removed);
        commenter.await.unwrap();
        replier.await.unwrap();
    }

    assert_eq!(orphans(&db).await, (0, 0));
    let refs: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM post_comment_refs) + (SELECT COUNT(*) FROM post_reply_refs)",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();
    assert_eq!(refs, 0);
}
