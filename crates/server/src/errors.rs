use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use common::types::FieldError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::sessions::SessionError;

/// Error response envelope: `{success:false, message, errors?}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a Vec<FieldError>>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".into(),
            errors: Some(errors),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required. Please log in.")
    }

    /// 500 with a generic client message; the cause only goes to the log.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "internal server error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
            errors: self.errors.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Product not found"),
            ServiceError::Forbidden(msg) => Self::new(StatusCode::FORBIDDEN, format!("Access denied. {}", capitalize(&msg))),
            ServiceError::Db(msg) => Self::internal(msg),
            ServiceError::Model(err) => Self::internal(err),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AuthError::Conflict => Self::new(StatusCode::BAD_REQUEST, "User already exists with this email"),
            AuthError::NotFound | AuthError::Unauthorized => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthError::HashError(msg) | AuthError::Repository(msg) => Self::internal(msg),
        }
    }
}

impl From<SessionError> for JsonApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Repository(msg) => Self::internal(msg),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
