use std::collections::BTreeMap;
use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::role::models::Role;
use crate::domain::user::models::Principal;
use crate::user::errors::UserError;

pub mod get_user;
pub mod list_roles;
pub mod login;
pub mod profile;
pub mod register;
pub mod session;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    message: String,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

/// Failure leaving the service.
///
/// `Unauthorized` and `InternalServerError` carry internal detail for the
/// log line only; their response bodies are fixed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    Validation {
        operation: String,
        errors: Vec<FieldError>,
    },
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody::new("Internal Server Error"),
                )
            }
            ApiError::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Request rejected as unauthorized");
                (StatusCode::UNAUTHORIZED, ApiErrorBody::new("Unauthorized"))
            }
            ApiError::Validation { operation, errors } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    message: format!("Validation Error | {}", operation),
                    errors,
                },
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiErrorBody::new(&msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ApiErrorBody::new(&msg)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials | UserError::Unauthorized(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            UserError::AlreadyExists(_) => ApiError::Conflict("User Already Exists".to_string()),
            UserError::NotFound(_) | UserError::InvalidUserId(_) => {
                ApiError::NotFound("User Not Found".to_string())
            }
            UserError::Hashing(_) | UserError::Token(_) | UserError::StoreUnavailable(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiErrorBody {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            errors: Vec::new(),
        }
    }
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub property: String,
    pub constraints: BTreeMap<String, String>,
}

/// Collects field failures so a request reports all of them at once.
#[derive(Debug)]
pub struct RequestValidator {
    operation: &'static str,
    errors: Vec<FieldError>,
}

impl RequestValidator {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            errors: Vec::new(),
        }
    }

    /// Record `result` for `property`, returning the parsed value on success.
    pub fn check<T, E: Display>(
        &mut self,
        property: &str,
        constraint: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let mut constraints = BTreeMap::new();
                constraints.insert(constraint.to_string(), e.to_string());
                self.errors.push(FieldError {
                    property: property.to_string(),
                    constraints,
                });
                None
            }
        }
    }

    /// Report a body that could not be read as JSON at all.
    pub fn reject_body(mut self, rejection: JsonRejection) -> ApiError {
        let constraint = match &rejection {
            JsonRejection::JsonDataError(_) => "isValid",
            JsonRejection::JsonSyntaxError(_) => "isJson",
            JsonRejection::MissingJsonContentType(_) => "contentType",
            _ => "isReadable",
        };
        self.check::<(), _>("body", constraint, Err(rejection.body_text()));
        self.into_error()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::Validation {
            operation: self.operation.to_string(),
            errors: self.errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleData {
    pub id: i32,
    pub name: String,
}

impl From<&Role> for RoleData {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.0,
            name: role.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalData {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: RoleData,
    pub created_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            name: principal.name.as_str().to_string(),
            surname: principal.surname.as_str().to_string(),
            email: principal.email.as_str().to_string(),
            role: (&principal.role).into(),
            created_at: principal.created_at,
        }
    }
}
