use auth::PasswordError;
use thiserror::Error;

use crate::domain::role::errors::RoleError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for name and surname validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },

    #[error("Password too long: maximum {max} characters")]
    TooLong { max: usize },
}

/// Top-level error for authentication flow operations
///
/// Messages may carry internal detail. They are meant for logs; the HTTP
/// boundary decides what a client gets to see.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    // Domain-level errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<PasswordError> for UserError {
    fn from(err: PasswordError) -> Self {
        UserError::Hashing(err.to_string())
    }
}

impl From<RoleError> for UserError {
    fn from(err: RoleError) -> Self {
        UserError::StoreUnavailable(err.to_string())
    }
}

impl From<auth::AuthenticationError> for UserError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => UserError::from(e),
            auth::AuthenticationError::TokenError(e) => UserError::Token(e.to_string()),
        }
    }
}
