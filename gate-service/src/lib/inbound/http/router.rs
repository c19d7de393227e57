use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::list_roles::list_roles;
use super::handlers::login::login;
use super::handlers::profile::profile;
use super::handlers::register::register;
use super::handlers::session::session;
use super::handlers::ApiError;
use super::middleware::require_bearer;
use super::middleware::require_claims;
use super::middleware::RouteGuard;
use crate::domain::role::models::AccessRole;
use crate::domain::role::registry::RoleRegistry;
use crate::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
}

/// Build the HTTP application.
///
/// Guarded groups stack the presence guard outside the validity guard, so a
/// request without a bearer token never reaches token verification.
pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    authenticator: Arc<Authenticator>,
    registry: &RoleRegistry,
    api_prefix: &str,
) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let bearer_routes = Router::new()
        .route("/auth/profile", get(profile).post(profile))
        .route_layer(middleware::from_fn(require_bearer));

    let session_routes = Router::new()
        .route("/session", get(session))
        .route_layer(middleware::from_fn_with_state(
            RouteGuard::authenticated(Arc::clone(&authenticator)),
            require_claims,
        ))
        .route_layer(middleware::from_fn(require_bearer));

    let admin_routes = Router::new()
        .route("/roles", get(list_roles))
        .route("/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            RouteGuard::requiring(authenticator, registry.id_of(AccessRole::Admin)),
            require_claims,
        ))
        .route_layer(middleware::from_fn(require_bearer));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(bearer_routes)
        .merge(session_routes)
        .merge(admin_routes);

    // Headers are left out of the span; they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest(api_prefix, api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalServerError(format!("handler panicked: {}", detail)).into_response()
}
