//! User repository for plaza (identity store).

use chrono::{DateTime, Utc};

use super::user::{normalize_email, NewUser, Role, User};
use super::DbPool;
use crate::{PlazaError, Result};

/// Raw `users` row.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role.parse().unwrap_or(Role::User),
            created_at: self.created_at,
        }
    }
}

/// Repository for user records.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Fails with `DuplicateEmail` when the email is already registered; the
    /// existing record is left untouched.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (name, email, password, role, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(new_user.role.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await;

        let id = match result {
            Ok(id) => id,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(PlazaError::DuplicateEmail(new_user.email.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        self.find_by_id(id)
            .await?
            .ok_or_else(|| PlazaError::NotFound("user".to_string()))
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password, role, created_at FROM users WHERE email = ?",
        )
        .bind(normalize_email(email))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Check if an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(normalize_email(email))
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }
}
