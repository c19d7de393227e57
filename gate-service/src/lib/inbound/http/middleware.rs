use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::role::models::RoleId;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

/// Raw bearer token, stored in request extensions by `require_bearer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// Verified caller identity, stored in request extensions by `require_claims`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Verification settings for one group of routes.
#[derive(Clone)]
pub struct RouteGuard {
    authenticator: Arc<Authenticator>,
    required_role: Option<RoleId>,
}

impl RouteGuard {
    /// Any valid token passes.
    pub fn authenticated(authenticator: Arc<Authenticator>) -> Self {
        Self {
            authenticator,
            required_role: None,
        }
    }

    /// Only valid tokens carrying `role` pass.
    pub fn requiring(authenticator: Arc<Authenticator>, role: RoleId) -> Self {
        Self {
            authenticator,
            required_role: Some(role),
        }
    }
}

/// Presence guard: rejects requests without a usable bearer token.
pub async fn require_bearer(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())
        .map(str::to_string)
        .map_err(|reason| ApiError::Unauthorized(reason.to_string()))?;

    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

/// Validity and role guard: verifies the token left by `require_bearer`.
pub async fn require_claims(
    State(guard): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .extensions()
        .get::<BearerToken>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("no bearer token on request".to_string()))?;

    let claims = guard
        .authenticator
        .validate_token(&token.0)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let role_id = RoleId(claims.role_id);
    if let Some(required) = guard.required_role {
        if role_id != required {
            return Err(ApiError::Unauthorized(format!(
                "role {} does not satisfy required role {}",
                role_id, required
            )));
        }
    }

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|e| ApiError::Unauthorized(format!("subject is not a user id: {}", e)))?;
    let (Some(issued_at), Some(expires_at)) = (claims.issued_at(), claims.expires_at()) else {
        return Err(ApiError::Unauthorized(
            "token timestamps out of range".to_string(),
        ));
    };

    req.extensions_mut().insert(AuthenticatedPrincipal {
        user_id,
        role_id,
        issued_at,
        expires_at,
    });

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is case-sensitive and separated by exactly one space.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Authorization header is not visible ASCII")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization scheme is not Bearer")?;

    if token.is_empty() || token == "null" || token == "undefined" {
        return Err("bearer token is empty");
    }
    if token.chars().any(char::is_whitespace) {
        return Err("bearer token contains whitespace");
    }

    Ok(token)
}
