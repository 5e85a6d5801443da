//! User model for plaza.
//!
//! Defines the User record and the Role enum.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member.
    #[default]
    User,
    /// Administrator: may post official replies and moderate content.
    Admin,
}

impl Role {
    /// Convert role to its database/wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Resolve the role requested at signup.
    ///
    /// Anything other than a recognised role name falls back to `User`.
    /// Requesting `admin` is honoured.
    pub fn from_signup(requested: Option<&str>) -> Self {
        requested
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }

    /// Check if this is the admin role.
    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address (unique, stored lowercase).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Role, fixed at signup.
    pub role: Role,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password hash (must already be hashed).
    pub password: String,
    /// Role (defaults to User).
    pub role: Role,
}

impl NewUser {
    /// Create a new user with the default role.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: normalize_email(&email.into()),
            password: password_hash.into(),
            role: Role::User,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("moderator".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_from_signup() {
        assert_eq!(Role::from_signup(None), Role::User);
        assert_eq!(Role::from_signup(Some("user")), Role::User);
        assert_eq!(Role::from_signup(Some("admin")), Role::Admin);
        assert_eq!(Role::from_signup(Some("superuser")), Role::User);
        assert_eq!(Role::from_signup(Some("")), Role::User);
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let user = NewUser::new("Alice", "  Alice@Example.COM ", "hash");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::User);

        let admin = NewUser::new("Root", "root@example.com", "hash").with_role(Role::Admin);
        assert!(admin.role.is_admin());
    }
}
