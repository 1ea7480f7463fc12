//! CLI module for field-enforce
//!
//! Enforces rule catalogs against record files, applies defaults, and
//! checks single values from the command line.

pub mod commands;
pub mod output;

pub use commands::{EnforceCli, EnforceCommands};
pub use output::{DefaultsOutput, EnforcementOutput, OutputFormat};

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No violations
    Success = 0,
    /// One or more rule violations
    Violations = 1,
    /// Invalid input, arguments or record shape
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Catalog could not be loaded or lacks the record type
    CatalogError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    pub fn from_violations(violations: &[String]) -> Self {
        if violations.is_empty() {
            ExitCode::Success
        } else {
            ExitCode::Violations
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: EnforceCli) -> Result<ExitCode, CliError> {
    let quiet = cli.quiet;
    match cli.command {
        EnforceCommands::Check {
            catalog,
            record,
            input,
            defaults,
            format,
        } => commands::execute_check(catalog, record, input, defaults, format, quiet),
        EnforceCommands::Defaults {
            catalog,
            record,
            input,
            format,
        } => commands::execute_defaults(catalog, record, input, format, quiet),
        EnforceCommands::Value {
            value,
            rules,
            kind,
            format,
        } => commands::execute_value(value, rules, kind, format, quiet),
    }
}
