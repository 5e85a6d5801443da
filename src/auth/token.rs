//! Bearer credential issuing and verification.
//!
//! Tokens are HS256 JWTs embedding `{id, email, role}`. There is no refresh
//! or revocation; a token is valid until it expires.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Role, User};
use crate::PlazaError;

/// The acting identity carried by a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID.
    pub id: i64,
    /// Email at the time the credential was issued.
    pub email: String,
    /// Role at the time the credential was issued.
    pub role: Role,
}

impl Identity {
    /// Check if this identity holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    id: i64,
    email: String,
    role: Role,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Credential errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No credential was presented.
    #[error("no token provided")]
    Missing,

    /// Malformed, unsigned, wrongly signed or expired credential.
    #[error("invalid or expired token")]
    Invalid,

    /// The credential could not be signed.
    #[error("failed to issue token: {0}")]
    Issue(String),
}

impl From<CredentialError> for PlazaError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Issue(msg) => PlazaError::Config(msg),
            other => PlazaError::Auth(other.to_string()),
        }
    }
}

/// Issues and verifies bearer credentials.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl TokenService {
    /// Create a token service from a signing secret and a lifetime in seconds.
    pub fn new(secret: &str, lifetime_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime_secs: i64::try_from(lifetime_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issue a credential for the identity, valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, CredentialError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let iat = now.timestamp();
        let claims = Claims {
            id: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            iat,
            exp: iat.saturating_add(self.lifetime_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            CredentialError::Issue(e.to_string())
        })
    }

    /// Verify a credential and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialError::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            CredentialError::Invalid
        })?;

        Ok(Identity {
            id: data.claims.id,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}
