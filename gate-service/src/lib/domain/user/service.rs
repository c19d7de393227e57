use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::role::models::AccessRole;
use crate::domain::role::models::Role;
use crate::domain::role::ports::RoleRepository;
use crate::domain::role::registry::RoleRegistry;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Principal;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementing the authentication flow.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Password work runs on the blocking pool; every store call is bounded by
/// `store_timeout`.
pub struct AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RoleRepository,
{
    users: Arc<UR>,
    roles: Arc<RR>,
    authenticator: Arc<Authenticator>,
    registry: RoleRegistry,
    store_timeout: Duration,
}

impl<UR, RR> AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RoleRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User store implementation
    /// * `roles` - Role store implementation
    /// * `authenticator` - Password and token primitives
    /// * `registry` - Access roles resolved at startup
    /// * `store_timeout` - Upper bound for a single store call
    pub fn new(
        users: Arc<UR>,
        roles: Arc<RR>,
        authenticator: Arc<Authenticator>,
        registry: RoleRegistry,
        store_timeout: Duration,
    ) -> Self {
        Self {
            users,
            roles,
            authenticator,
            registry,
            store_timeout,
        }
    }

    async fn within_deadline<T, F>(&self, operation: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>> + Send,
    {
        tokio::time::timeout(self.store_timeout, operation)
            .await
            .map_err(|_| {
                UserError::StoreUnavailable(format!(
                    "store call exceeded {} ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> Result<T, UserError> + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || job(&authenticator))
            .await
            .map_err(|e| UserError::Hashing(format!("password task failed: {}", e)))?
    }
}

#[async_trait]
impl<UR, RR> AuthServicePort for AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RoleRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Principal, UserError> {
        let RegisterCommand {
            name,
            surname,
            email,
            password,
        } = command;

        if self
            .within_deadline(self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(UserError::AlreadyExists(email.to_string()));
        }

        let password_hash = self
            .run_blocking(move |authenticator| {
                authenticator
                    .hash_password(password.expose())
                    .map_err(UserError::from)
            })
            .await?;

        let user = User {
            id: UserId::new(),
            name,
            surname,
            email,
            password_hash,
            role: self.registry.role(AccessRole::Member).clone(),
            created_at: Utc::now(),
        };

        let created_user = self.within_deadline(self.users.create(user)).await?;

        Ok(created_user.into())
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, UserError> {
        let LoginCommand { email, password } = command;

        let Some(user) = self.within_deadline(self.users.find_by_email(&email)).await? else {
            return self
                .run_blocking(move |authenticator| {
                    Err(authenticator
                        .reject_unknown_account(password.expose())
                        .into())
                })
                .await;
        };

        let stored_hash = user.password_hash.clone();
        let subject = user.id.to_string();
        let role_id = user.role.id.0;

        let result = self
            .run_blocking(move |authenticator| {
                authenticator
                    .authenticate(password.expose(), &stored_hash, subject, role_id)
                    .map_err(UserError::from)
            })
            .await?;

        Ok(Session {
            principal: user.into(),
            access_token: result.access_token,
        })
    }

    async fn resolve(&self, token: &str) -> Result<Principal, UserError> {
        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| UserError::Unauthorized(e.to_string()))?;

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|e| UserError::Unauthorized(format!("subject is not a user id: {}", e)))?;

        self.within_deadline(self.users.find_by_id(&user_id))
            .await
            .map_err(|e| UserError::Unauthorized(format!("subject lookup failed: {}", e)))?
            .map(Principal::from)
            .ok_or_else(|| UserError::Unauthorized(format!("subject {} no longer exists", user_id)))
    }

    async fn get_user(&self, id: &UserId) -> Result<Principal, UserError> {
        self.within_deadline(self.users.find_by_id(id))
            .await?
            .map(Principal::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, UserError> {
        self.within_deadline(async { self.roles.find_all().await.map_err(UserError::from) })
            .await
    }
}
