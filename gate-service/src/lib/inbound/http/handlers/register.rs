use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use super::RequestValidator;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let Json(body) =
        body.map_err(|rejection| RequestValidator::new("Register").reject_body(rejection))?;

    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User Registered Successfully",
                principal.into(),
            )
        })
}

/// HTTP request body for registration (raw JSON)
///
/// Any `role` field sent by the client is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    name: String,
    surname: String,
    email: String,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let mut validator = RequestValidator::new("Register");

        let name = validator.check("name", "length", PersonName::new(self.name));
        let surname = validator.check("surname", "length", PersonName::new(self.surname));
        let email = validator.check("email", "isEmail", EmailAddress::new(self.email));
        let password = validator.check("password", "length", Password::new(self.password));

        match (name, surname, email, password) {
            (Some(name), Some(surname), Some(email), Some(password)) => Ok(RegisterCommand {
                name,
                surname,
                email,
                password,
            }),
            _ => Err(validator.into_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, surname: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request_builds_command() {
        let command = request("Nicola", "Bernardo", "nicola@example.com", "correct horse")
            .try_into_command()
            .unwrap();

        assert_eq!(command.email.as_str(), "nicola@example.com");
        assert_eq!(command.password.expose(), "correct horse");
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let err = request("Al", "Bernardo", "not-an-email", "short")
            .try_into_command()
            .unwrap_err();

        let ApiError::Validation { operation, errors } = err else {
            panic!("expected validation error, got {:?}", err);
        };
        assert_eq!(operation, "Register");
        let properties: Vec<&str> = errors.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(properties, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let body: RegisterRequest = serde_json::from_str(r#"{"role": 1}"#).unwrap();

        let err = body.try_into_command().unwrap_err();

        assert!(matches!(err, ApiError::Validation { ref errors, .. } if errors.len() == 4));
    }
}
