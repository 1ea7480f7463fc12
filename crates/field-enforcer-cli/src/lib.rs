//! field-enforce
//!
//! Command-line front end for the `field-enforcer` engine. Rule catalogs
//! and record files may be TOML, YAML or JSON.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Enforce a record against a catalog record type
//! field-enforce check --catalog rules.toml --record SignupReq --input signup.json
//!
//! # Apply defaults first, then enforce
//! field-enforce check --catalog rules.toml --record ProductReq --input product.yaml --defaults
//!
//! # Print a record with defaults applied
//! field-enforce defaults --catalog rules.toml --record ProductReq --input product.yaml
//!
//! # Check a single value
//! field-enforce value --value 9 --kind integer --rules "between:2,10 exclude:9"
//! ```

pub mod cli;
pub mod error;

pub use cli::{EnforceCli, EnforceCommands, ExitCode, OutputFormat};
pub use error::CliError;

/// Run the CLI application and map failures to exit codes
pub fn run_cli(cli: EnforceCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if !e.is_user_error() {
                tracing::error!(error = %e, "command failed");
            }
            e.exit_code()
        }
    }
}
