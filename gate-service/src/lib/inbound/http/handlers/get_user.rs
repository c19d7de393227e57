use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|_| ApiError::NotFound("User Not Found".to_string()))?;

    state
        .auth_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, "User", principal.into()))
}
