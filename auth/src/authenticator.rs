use chrono::Duration;

use crate::password::PasswordConfig;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::TokenConfig;
use crate::token::TokenError;
use crate::token::TokenService;

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds no per-request state and can be shared behind an `Arc` across
/// every request handler.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    dummy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Hashes a throwaway password once so that logins for unknown accounts
    /// can spend the same verification work as logins for known ones.
    ///
    /// # Arguments
    /// * `token_config` - Signing secret and token TTL
    /// * `password_config` - Argon2 cost parameters for new hashes
    ///
    /// # Errors
    /// * `PasswordError` - Invalid cost parameters or hashing failure
    pub fn new(
        token_config: &TokenConfig,
        password_config: PasswordConfig,
    ) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::with_config(password_config)?;
        let dummy_hash = password_hasher.hash("dummy-password-for-unknown-accounts")?;

        Ok(Self {
            password_hasher,
            token_service: TokenService::new(token_config),
            dummy_hash,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_service.ttl()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Subject identifier to embed in the token
    /// * `role_id` - Role identifier to embed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
        role_id: i32,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(subject, role_id)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Spends one verification against the dummy hash, then yields the same
    /// `InvalidCredentials` a wrong password produces.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        // Outcome ignored, only the elapsed time matters
        let _ = self.password_hasher.verify(password, &self.dummy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString, role_id: i32) -> Result<String, TokenError> {
        self.token_service.issue(subject, role_id)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_service.verify(token)
    }
}
