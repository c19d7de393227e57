#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordConfig;
use auth::TokenConfig;
use chrono::Utc;
use gate_service::domain::role::errors::RoleError;
use gate_service::domain::role::models::AccessRole;
use gate_service::domain::role::models::Role;
use gate_service::domain::role::models::RoleId;
use gate_service::domain::role::models::RoleNames;
use gate_service::domain::role::ports::RoleRepository;
use gate_service::domain::role::registry::RoleRegistry;
use gate_service::domain::user::errors::UserError;
use gate_service::domain::user::models::EmailAddress;
use gate_service::domain::user::models::PersonName;
use gate_service::domain::user::models::User;
use gate_service::domain::user::models::UserId;
use gate_service::domain::user::ports::AuthServicePort;
use gate_service::domain::user::ports::UserRepository;
use gate_service::domain::user::service::AuthService;
use gate_service::inbound::http::router::create_router;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const API_PREFIX: &str = "/api/v1";

/// In-memory user store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::AlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

/// Role store seeded the way the migration seeds it.
pub struct InMemoryRoleRepository {
    roles: Vec<Role>,
}

impl Default for InMemoryRoleRepository {
    fn default() -> Self {
        Self {
            roles: vec![
                Role {
                    id: RoleId(1),
                    name: "admin".to_string(),
                },
                Role {
                    id: RoleId(2),
                    name: "user".to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_all(&self) -> Result<Vec<Role>, RoleError> {
        Ok(self.roles.clone())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub registry: RoleRegistry,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application backed by in-memory stores
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let roles = Arc::new(InMemoryRoleRepository::default());
        let authenticator = authenticator();
        let registry = RoleRegistry::load(roles.as_ref(), &RoleNames::default())
            .await
            .expect("Failed to resolve roles");

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            roles,
            Arc::clone(&authenticator),
            registry.clone(),
            Duration::from_secs(5),
        ));

        Self::serve(auth_service, authenticator, registry, users).await
    }

    /// Spawn the application around an arbitrary service implementation
    pub async fn spawn_with_service(auth_service: Arc<dyn AuthServicePort>) -> Self {
        let roles = InMemoryRoleRepository::default();
        let registry = RoleRegistry::load(&roles, &RoleNames::default())
            .await
            .expect("Failed to resolve roles");

        Self::serve(
            auth_service,
            authenticator(),
            registry,
            Arc::new(InMemoryUserRepository::default()),
        )
        .await
    }

    async fn serve(
        auth_service: Arc<dyn AuthServicePort>,
        authenticator: Arc<Authenticator>,
        registry: RoleRegistry,
        users: Arc<InMemoryUserRepository>,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        let router = create_router(
            auth_service,
            Arc::clone(&authenticator),
            &registry,
            API_PREFIX,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            api_client: reqwest::Client::new(),
            authenticator,
            registry,
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(format!("{}{}{}", self.address, API_PREFIX, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(format!("{}{}{}", self.address, API_PREFIX, path))
    }

    /// Register an account through the API
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&serde_json::json!({
                "name": "Nicola",
                "surname": "Bernardo",
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the access token
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        assert_eq!(self.register(email, password).await.status(), 201);
        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// Store an administrator directly, bypassing registration
    pub async fn seed_admin(&self, email: &str) -> User {
        let user = User {
            id: UserId::new(),
            name: PersonName::new("Administrator".to_string()).unwrap(),
            surname: PersonName::new("Account".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: self.authenticator.hash_password("admin_password").unwrap(),
            role: self.registry.role(AccessRole::Admin).clone(),
            created_at: Utc::now(),
        };
        self.users.create(user).await.unwrap()
    }
}

fn authenticator() -> Arc<Authenticator> {
    Arc::new(
        Authenticator::new(
            &TokenConfig::new(TEST_SECRET.to_vec(), chrono::Duration::minutes(60)),
            PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .expect("Failed to create authenticator"),
    )
}
