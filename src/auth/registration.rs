//! Signup and login for plaza.

use tracing::{info, warn};
use validator::ValidateEmail;

use crate::auth::password::{hash_password, verify_dummy, verify_password, PasswordError};
use crate::db::{NewUser, Role, User, UserRepository};
use crate::{PlazaError, Result};

/// Message returned for any login failure.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Signup request data.
#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Requested role; anything but `user`/`admin` falls back to `user`.
    pub role: Option<String>,
}

impl SignupRequest {
    /// Create a signup request where the confirmation matches the password.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            role: None,
        }
    }

    /// Set the requested role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Register a new user.
///
/// Checks, in order: all fields present, email well formed, email not
/// taken, passwords match, password length. Only then is the password
/// hashed and the user stored.
pub async fn register(repo: &UserRepository<'_>, request: SignupRequest) -> Result<User> {
    let name = request.name.trim();
    let email = request.email.trim();

    if name.is_empty()
        || email.is_empty()
        || request.password.is_empty()
        || request.confirm_password.is_empty()
    {
        return Err(PlazaError::Validation("All fields are required".to_string()));
    }

    if !email.validate_email() {
        return Err(PlazaError::Validation("Invalid email format".to_string()));
    }

    if repo.email_exists(email).await? {
        return Err(PlazaError::DuplicateEmail(email.to_string()));
    }

    if request.password != request.confirm_password {
        return Err(PlazaError::Validation("Passwords do not match".to_string()));
    }

    let password_hash = hash_password(&request.password).map_err(password_error)?;
    let role = Role::from_signup(request.role.as_deref());

    // The UNIQUE index still rejects a concurrent signup with the same email.
    let user = repo
        .create(&NewUser::new(name, email, password_hash).with_role(role))
        .await?;

    info!(user_id = user.id, role = %user.role, "New user registered");

    Ok(user)
}

/// Check an email/password pair and return the matching user.
///
/// Unknown email and wrong password fail identically, and both cost one
/// password verification.
pub async fn authenticate(repo: &UserRepository<'_>, email: &str, password: &str) -> Result<User> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(PlazaError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = repo.find_by_email(email).await? else {
        verify_dummy(password);
        return Err(PlazaError::Auth(INVALID_CREDENTIALS.to_string()));
    };

    match verify_password(password, &user.password) {
        Ok(()) => Ok(user),
        Err(PasswordError::VerificationFailed) => {
            Err(PlazaError::Auth(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => {
            warn!(user_id = user.id, "Stored password hash is unusable: {}", e);
            Err(PlazaError::Auth(INVALID_CREDENTIALS.to_string()))
        }
    }
}

fn password_error(e: PasswordError) -> PlazaError {
    match e {
        PasswordError::TooShort | PasswordError::TooLong => PlazaError::Validation(e.to_string()),
        other => PlazaError::Database(other.to_string()),
    }
}
