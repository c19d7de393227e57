//! Authentication primitives for the access gate
//!
//! Provides:
//! - Password hashing (Argon2id, tunable cost)
//! - Signed bearer token issuance and verification (HS256)
//! - Authentication coordination
//!
//! Nothing in this crate performs I/O. Account lookup and persistence are the
//! caller's concern.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenConfig, TokenService};
//! use chrono::Duration;
//!
//! let service = TokenService::new(&TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     Duration::hours(1),
//! ));
//! let token = service.issue("user123", 2).unwrap();
//! let claims = service.verify(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! assert_eq!(claims.role_id, 2);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordConfig, TokenConfig};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     &TokenConfig::new(b"secret_key_at_least_32_bytes_long!".to_vec(), Duration::hours(1)),
//!     PasswordConfig::default(),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "user123", 2).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.role_id, 2);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordConfig;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenConfig;
pub use token::TokenError;
pub use token::TokenService;
