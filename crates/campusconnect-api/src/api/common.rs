// Common DTOs for public API
//
// Every endpoint answers with the same envelope:
// `{success, data?, error?, message?, database?}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campusconnect_core::CampusError;
use campusconnect_storage::ConnectionStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable confirmation for operations without a payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Active store (`primary` or `fallback`) on event routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "primary")]
    pub database: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            database: None,
        }
    }

    pub fn with_database(mut self, status: ConnectionStatus) -> Self {
        self.database = Some(status.to_string());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            database: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error returned by handlers; rendered as a failure envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a service error. Storage failures are logged and replaced by
    /// `context` so driver details never reach the client.
    pub fn from_error(err: CampusError, context: &str) -> Self {
        match err {
            CampusError::Validation(msg) | CampusError::Rule(msg) => Self::bad_request(msg),
            CampusError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            CampusError::Storage(e) => {
                tracing::error!("{}: {:#}", context, e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
            message: None,
            database: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Treat blank strings and the client's literal "undefined" as absent.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "undefined")
}
