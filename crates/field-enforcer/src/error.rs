//! Error types for the field enforcement engine
//!
//! Rule violations are plain strings returned in a list and never show up
//! here. `EnforceError` covers caller misuse (wrong record shape, unknown
//! fields), fail-fast default injection and catalog loading.

use thiserror::Error;

use crate::value::FieldKind;

/// Main error type for enforcement operations
#[derive(Error, Debug)]
pub enum EnforceError {
    /// The value handed to a record operation is not record-shaped
    #[error("Record expected: {expected} required, got {actual}")]
    NotARecord {
        expected: &'static str,
        actual: String,
    },

    /// A `default:` directive could not be applied
    #[error("Invalid default for field '{field}': {reason}")]
    InvalidDefault { field: String, reason: String },

    /// The record has no field with this name
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// A value of the wrong kind was written into a field
    #[error("Field '{field}' expects a {expected} value, got {actual}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// The rule catalog is malformed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// File access error while loading a catalog
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog content could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl EnforceError {
    /// Create an invalid default error
    pub fn invalid_default(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EnforceError::InvalidDefault {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        EnforceError::Catalog(msg.into())
    }

    /// Check if this error comes from caller misuse rather than bad data
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EnforceError::NotARecord { .. }
                | EnforceError::UnknownField(_)
                | EnforceError::KindMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for EnforceError {
    fn from(err: serde_json::Error) -> Self {
        EnforceError::Parse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for EnforceError {
    fn from(err: serde_yaml::Error) -> Self {
        EnforceError::Parse(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for EnforceError {
    fn from(err: toml::de::Error) -> Self {
        EnforceError::Parse(format!("TOML error: {}", err))
    }
}

/// Result type alias for enforcement operations
pub type Result<T> = std::result::Result<T, EnforceError>;
