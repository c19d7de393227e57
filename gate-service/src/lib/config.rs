use std::env;
use std::time::Duration;

use auth::PasswordConfig;
use auth::TokenConfig;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::role::models::RoleNames;

/// Application configuration for gate-service.
///
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordSettings,
    #[serde(default)]
    pub roles: RoleNames,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

// Keeps the secret out of `Configuration loaded` logs
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        let defaults = PasswordConfig::default();
        Self {
            memory_kib: defaults.memory_kib,
            iterations: defaults.iterations,
            parallelism: defaults.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_expiration_minutes() -> i64 {
    60
}

impl Config {
    const MIN_SECRET_BYTES: usize = 32;

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the process cannot safely run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < Self::MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                Self::MIN_SECRET_BYTES
            )));
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_minutes must be positive".to_string(),
            ));
        }
        self.token_ttl()?;
        if self.store.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "store.timeout_ms must be positive".to_string(),
            ));
        }
        if !self.server.api_prefix.starts_with('/') || self.server.api_prefix.len() < 2 {
            return Err(ConfigError::Message(
                "server.api_prefix must start with '/' and not be the root".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        Ok(TokenConfig::new(
            self.jwt.secret.as_bytes().to_vec(),
            self.token_ttl()?,
        ))
    }

    /// Token lifetime, rejected when an expiry computed from now would overflow.
    fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.jwt.expiration_minutes)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "jwt.expiration_minutes {} is out of range",
                    self.jwt.expiration_minutes
                ))
            })
    }

    pub fn password_config(&self) -> PasswordConfig {
        PasswordConfig {
            memory_kib: self.password.memory_kib,
            iterations: self.password.iterations,
            parallelism: self.password.parallelism,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store.timeout_ms)
    }
}
