//! field-enforce
//!
//! # Exit Codes
//!
//! - 0: Success - no violations
//! - 1: One or more rule violations
//! - 3: Invalid input, arguments or record shape
//! - 4: File not found or inaccessible
//! - 5: Catalog errors
//! - 10: Internal error

use clap::Parser;
use field_enforcer_cli::{run_cli, EnforceCli};

fn main() {
    let cli = EnforceCli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
