//! Authentication and authorization for plaza.
//!
//! This module provides password hashing, bearer credentials, signup/login
//! and the per-operation authorization guard.

pub mod guard;
mod password;
mod registration;
mod token;

pub use guard::{authorize, require, require_actor, Decision, Denial, Operation, Policy};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{authenticate, register, SignupRequest, INVALID_CREDENTIALS};
pub use token::{CredentialError, Identity, TokenService};
