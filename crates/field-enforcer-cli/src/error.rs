//! Error types for the field-enforce CLI

use field_enforcer::EnforceError;
use thiserror::Error;

use crate::cli::ExitCode;

/// Errors surfaced by CLI commands
///
/// Rule violations are not errors; they are reported as output with
/// [`ExitCode::Violations`].
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Record file parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rule catalog error
    #[error("Catalog error: {0}")]
    CatalogError(String),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    pub fn file_error(msg: impl Into<String>) -> Self {
        CliError::FileError(msg.into())
    }

    pub fn catalog_error(msg: impl Into<String>) -> Self {
        CliError::CatalogError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidInput(_)
                | CliError::FileError(_)
                | CliError::ParseError(_)
                | CliError::CatalogError(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidInput(_) | CliError::ParseError(_) => ExitCode::InvalidInput,
            CliError::FileError(_) => ExitCode::FileError,
            CliError::CatalogError(_) => ExitCode::CatalogError,
            CliError::SerializationError(_) | CliError::InternalError(_) => ExitCode::InternalError,
        }
    }
}

impl From<EnforceError> for CliError {
    fn from(err: EnforceError) -> Self {
        match err {
            EnforceError::Io(e) => CliError::FileError(e.to_string()),
            EnforceError::Parse(msg) => CliError::ParseError(msg),
            EnforceError::Catalog(msg) => CliError::CatalogError(msg),
            err @ (EnforceError::NotARecord { .. } | EnforceError::InvalidDefault { .. }) => {
                CliError::InvalidInput(err.to_string())
            }
            err => CliError::InternalError(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
