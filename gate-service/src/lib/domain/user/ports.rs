use async_trait::async_trait;

use crate::domain::role::models::Role;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Principal;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;

/// Port for the authentication flow.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account. Does not establish a session.
    ///
    /// # Arguments
    /// * `command` - Validated name, surname, email and password
    ///
    /// # Returns
    /// The stored principal
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `StoreUnavailable` - Store failed or timed out
    async fn register(&self, command: RegisterCommand) -> Result<Principal, UserError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Hashing` - Stored hash is corrupt
    /// * `Token` - Token issuance failed
    /// * `StoreUnavailable` - Store failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<Session, UserError>;

    /// Resolve the principal behind a bearer token.
    ///
    /// # Errors
    /// * `Unauthorized` - Invalid or expired token, or the subject no longer exists
    async fn resolve(&self, token: &str) -> Result<Principal, UserError>;

    /// Look up a principal by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` - Store failed or timed out
    async fn get_user(&self, id: &UserId) -> Result<Principal, UserError>;

    /// List every stored role.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store failed or timed out
    async fn list_roles(&self) -> Result<Vec<Role>, UserError>;
}

/// Lookup and save contract of the user store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
