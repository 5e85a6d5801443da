//! Database schema and migrations for plaza.
//!
//! Migrations are applied in order; `schema_version` records which ones ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users (identity store)
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,                  -- Argon2 PHC string
    role        TEXT NOT NULL DEFAULT 'user',   -- 'user' or 'admin'
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: posts and their like set
    r#"
CREATE TABLE posts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id    INTEGER NOT NULL REFERENCES users(id),
    author_name  TEXT NOT NULL,                 -- snapshot at creation
    author_role  TEXT NOT NULL DEFAULT 'user',  -- snapshot at creation
    content      TEXT NOT NULL,
    likes        INTEGER NOT NULL DEFAULT 0,
    is_enabled   INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX idx_posts_author_id ON posts(author_id);
CREATE INDEX idx_posts_created_at ON posts(created_at);

CREATE TABLE post_likes (
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    PRIMARY KEY (post_id, user_id)
);
"#,
    // v3: comments, their like set, and the post -> comment id list
    r#"
-- post_id is not a foreign key; the post cascade removes children itself.
CREATE TABLE comments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id      INTEGER NOT NULL,
    author_id    INTEGER NOT NULL REFERENCES users(id),
    author_name  TEXT NOT NULL,
    content      TEXT NOT NULL,
    likes        INTEGER NOT NULL DEFAULT 0,
    is_enabled   INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX idx_comments_post_id ON comments(post_id);

CREATE TABLE comment_likes (
    comment_id  INTEGER NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    PRIMARY KEY (comment_id, user_id)
);

-- Ordered commentIds of a post; position is the insertion order.
CREATE TABLE post_comment_refs (
    position    INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    comment_id  INTEGER NOT NULL UNIQUE
);

CREATE INDEX idx_post_comment_refs_post_id ON post_comment_refs(post_id);
"#,
    // v4: admin replies and the post -> reply id list
    r#"
CREATE TABLE admin_replies (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id      INTEGER NOT NULL,
    author_id    INTEGER NOT NULL REFERENCES users(id),
    content      TEXT NOT NULL,
    is_official  INTEGER NOT NULL DEFAULT 1,
    is_enabled   INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX idx_admin_replies_post_id ON admin_replies(post_id);

CREATE TABLE post_reply_refs (
    position    INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    reply_id    INTEGER NOT NULL UNIQUE
);

CREATE INDEX idx_post_reply_refs_post_id ON post_reply_refs(post_id);
"#,
];
