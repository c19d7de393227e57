use std::sync::Arc;

use auth::Authenticator;
use gate_service::config::Config;
use gate_service::domain::role::models::AccessRole;
use gate_service::domain::role::registry::RoleRegistry;
use gate_service::domain::user::service::AuthService;
use gate_service::inbound::http::router::create_router;
use gate_service::outbound::repositories::PostgresRoleRepository;
use gate_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gate-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        api_prefix = %config.server.api_prefix,
        token_ttl_minutes = config.jwt.expiration_minutes,
        store_timeout_ms = config.store.timeout_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.store_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool));

    let registry = RoleRegistry::load(role_repository.as_ref(), &config.roles).await?;
    tracing::info!(
        admin_role_id = %registry.role(AccessRole::Admin).id,
        member_role_id = %registry.role(AccessRole::Member).id,
        "Access roles resolved"
    );

    let authenticator = Arc::new(Authenticator::new(
        &config.token_config()?,
        config.password_config(),
    )?);

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        role_repository,
        Arc::clone(&authenticator),
        registry.clone(),
        config.store_timeout(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        authenticator,
        &registry,
        &config.server.api_prefix,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
