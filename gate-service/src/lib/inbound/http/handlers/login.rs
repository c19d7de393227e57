use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use super::RequestValidator;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::Session;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) =
        body.map_err(|rejection| RequestValidator::new("Login").reject_body(rejection))?;

    state
        .auth_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, "User Logged In", session.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ApiError> {
        let mut validator = RequestValidator::new("Login");

        let email = validator.check("email", "isEmail", EmailAddress::new(self.email));
        let password = validator.check("password", "length", Password::new(self.password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginCommand { email, password }),
            _ => Err(validator.into_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    #[serde(flatten)]
    pub principal: PrincipalData,
    pub token: String,
}

impl From<&Session> for LoginResponseData {
    fn from(session: &Session) -> Self {
        Self {
            principal: (&session.principal).into(),
            token: session.access_token.clone(),
        }
    }
}
