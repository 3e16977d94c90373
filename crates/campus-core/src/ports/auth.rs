//! Ports for issuing bearer tokens and storing passwords.

use uuid::Uuid;

use crate::domain::User;

/// What a valid bearer token says about its holder.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

pub trait TokenService: Send + Sync {
    /// Issue a token identifying `user` as a post author.
    fn generate_token(&self, user: &User) -> Result<String, AuthError>;

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn expiration_seconds(&self) -> i64;
}

pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
