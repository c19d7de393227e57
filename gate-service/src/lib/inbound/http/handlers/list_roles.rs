use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::RoleData;
use crate::inbound::http::router::AppState;

pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<RoleData>>, ApiError> {
    state
        .auth_service
        .list_roles()
        .await
        .map_err(ApiError::from)
        .map(|roles| {
            ApiSuccess::new(
                StatusCode::OK,
                "Roles",
                roles.iter().map(RoleData::from).collect(),
            )
        })
}
