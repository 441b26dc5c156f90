//! Error Types for the Rollbook API
//!
//! Defines the structured error response (`ApiError`), the error code
//! taxonomy (`ErrorCode`), and the Axum `IntoResponse` integration. Every
//! failure leaving the service carries a transport status code that mirrors
//! its taxonomy kind; the one deliberate exception is the duplicate marker
//! on the guarded update path, which is a success-shaped response and does
//! not pass through this module.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rollbook_core::{ConfigError, RollbookError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field format is incorrect
    InvalidFormat,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested document does not exist
    DocumentNotFound,

    /// No metadata record exists for the requested table
    MetadataNotFound,

    /// A query legitimately matched nothing where the caller expected data
    NoData,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// Entity with the same identifier already exists
    EntityAlreadyExists,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Record store operation failed
    StorageFailure,

    /// Service is temporarily unavailable
    ServiceUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            ErrorCode::DocumentNotFound
            | ErrorCode::MetadataNotFound
            | ErrorCode::NoData => StatusCode::NOT_FOUND,

            ErrorCode::EntityAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError | ErrorCode::StorageFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::MetadataNotFound => "Metadata record not found",
            ErrorCode::NoData => "No data found",
            ErrorCode::EntityAlreadyExists => "Entity already exists",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageFailure => "Record store operation failed",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Fixed failure marker so front-end clients can branch on one field
    pub status: FailureMarker,

    /// Human-readable error message
    pub error: String,
}

/// Serializes as the literal string "failed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FailureMarker {
    #[default]
    Failed,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: FailureMarker::Failed,
            error: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
    }

    /// Create a DocumentNotFound error.
    pub fn document_not_found(table: &str, serial_no: &str) -> Self {
        Self::new(
            ErrorCode::DocumentNotFound,
            format!(
                "Document with serial_no '{}' in table '{}' not found",
                serial_no, table
            ),
        )
    }

    /// Create a MetadataNotFound error.
    pub fn metadata_not_found(table: &str) -> Self {
        Self::new(
            ErrorCode::MetadataNotFound,
            format!("No metadata record for table '{}'", table),
        )
    }

    /// Create a NoData error.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoData, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a StorageFailure error.
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageFailure, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.error)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Allows ApiError to be returned directly from Axum handlers.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM CORE ERRORS
// ============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {:?}", err);
        match err {
            StorageError::AlreadyExists { entity, key } => ApiError::new(
                ErrorCode::EntityAlreadyExists,
                format!("{} already exists for key '{}'", entity, key),
            ),
            // Lock poisoning and backend faults surface as opaque 500s so
            // internal detail never leaks to the caller.
            StorageError::LockPoisoned | StorageError::Backend { .. } => {
                ApiError::from_code(ErrorCode::StorageFailure)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(&field),
            ValidationError::InvalidValue { field, reason } => ApiError::new(
                ErrorCode::ValidationFailed,
                format!("Invalid value for '{}': {}", field, reason),
            ),
        }
    }
}

impl From<RollbookError> for ApiError {
    fn from(err: RollbookError) -> Self {
        match err {
            RollbookError::Storage(e) => e.into(),
            RollbookError::Validation(e) => e.into(),
            RollbookError::Config(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
