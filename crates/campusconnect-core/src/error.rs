// Error types shared by services and HTTP handlers

use thiserror::Error;

/// Result type alias for CampusConnect operations
pub type Result<T> = std::result::Result<T, CampusError>;

/// Errors surfaced to API callers.
///
/// Storage adapters report failures as `anyhow::Error`; services wrap them in
/// [`CampusError::Storage`] so handlers can map every variant to a status code.
#[derive(Debug, Error)]
pub enum CampusError {
    /// Missing or malformed input (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// Unknown id (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// Business-rule violation such as a closed registration (HTTP 400)
    #[error("{0}")]
    Rule(String),

    /// Connection failure, timeout or driver error (HTTP 500)
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl CampusError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        CampusError::Validation(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        CampusError::NotFound(msg.into())
    }

    /// Create a business-rule error
    pub fn rule(msg: impl Into<String>) -> Self {
        CampusError::Rule(msg.into())
    }

    /// Error for a required field that is absent or blank
    pub fn missing_field(field: &str) -> Self {
        CampusError::Validation(format!("Missing required field: {field}"))
    }
}
