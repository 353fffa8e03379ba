//! Identity collaborator ports.
//!
//! The claims on a token are the actor's id and display name, nothing
//! more. The access model has no roles and no staff override: authorship
//! is the only privilege, so there is nothing else to carry.

use uuid::Uuid;

/// Decoded contents of a valid bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Mints and checks bearer tokens.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime; reported in login responses.
    fn expiration_seconds(&self) -> i64;
}

/// Hashes and verifies passwords.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("missing authorization header")]
    MissingAuth,

    #[error("hashing error: {0}")]
    HashingError(String),
}
