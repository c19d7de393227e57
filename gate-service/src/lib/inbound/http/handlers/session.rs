use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedPrincipal;

pub async fn session(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> ApiSuccess<SessionData> {
    ApiSuccess::new(StatusCode::OK, "Active Session", (&principal).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub user_id: String,
    pub role_id: i32,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthenticatedPrincipal> for SessionData {
    fn from(principal: &AuthenticatedPrincipal) -> Self {
        Self {
            user_id: principal.user_id.to_string(),
            role_id: principal.role_id.0,
            issued_at: principal.issued_at,
            expires_at: principal.expires_at,
        }
    }
}
