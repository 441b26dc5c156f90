//! Error types for Rollbook operations

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{entity} already exists for key '{key}'")]
    AlreadyExists { entity: String, key: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage backend error: {reason}")]
    Backend { reason: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Rollbook errors.
#[derive(Debug, Clone, Error)]
pub enum RollbookError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Rollbook operations.
pub type RollbookResult<T> = Result<T, RollbookError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_already_exists() {
        let err = StorageError::AlreadyExists {
            entity: "Metadata record".to_string(),
            key: "ward12".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("already exists"));
        assert!(msg.contains("ward12"));
    }

    #[test]
    fn test_validation_error_display_invalid_value() {
        let err = ValidationError::InvalidValue {
            field: "voter_id".to_string(),
            reason: "must be exactly 10 characters".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("voter_id"));
        assert!(msg.contains("10 characters"));
    }

    #[test]
    fn test_rollbook_error_from_variants() {
        let storage = RollbookError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, RollbookError::Storage(_)));

        let validation = RollbookError::from(ValidationError::RequiredFieldMissing {
            field: "serial_no".to_string(),
        });
        assert!(matches!(validation, RollbookError::Validation(_)));

        let config = RollbookError::from(ConfigError::MissingRequired {
            field: "bind".to_string(),
        });
        assert!(matches!(config, RollbookError::Config(_)));
    }
}
