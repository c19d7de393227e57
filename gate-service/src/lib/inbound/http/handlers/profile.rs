use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

/// Behind the presence guard only; the token is verified here by `resolve`.
pub async fn profile(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .auth_service
        .resolve(&token.0)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, "User Profile", principal.into()))
}
