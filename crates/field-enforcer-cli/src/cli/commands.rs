//! CLI command definitions for field-enforce
//!
//! Provides Clap-based commands for enforcing a rule catalog against a
//! record file, applying defaults, and checking a single value.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use field_enforcer::coerce::reconcile;
use field_enforcer::{Enforcer, FieldKind, FieldValue, RecordSchema, RuleCatalog};

use super::output::{DefaultsOutput, EnforcementOutput, OutputFormat};
use super::ExitCode;
use crate::error::{CliError, Result};

/// field-enforce CLI
///
/// Enforce declarative field rules on records and values.
#[derive(Parser, Debug)]
#[command(name = "field-enforce")]
#[command(about = "Enforce declarative field rules on records and values", long_about = None)]
#[command(version)]
pub struct EnforceCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: EnforceCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum EnforceCommands {
    /// Enforce a record file against a catalog record type
    Check {
        /// Path to the rule catalog (toml, yaml, yml, json)
        #[arg(short, long, env = "FIELD_ENFORCE_CATALOG")]
        catalog: PathBuf,

        /// Record type name in the catalog
        #[arg(short, long)]
        record: String,

        /// Path to the record file (json, yaml, yml, toml)
        #[arg(short, long)]
        input: PathBuf,

        /// Apply `default` and `prohibit` directives before enforcing
        #[arg(long)]
        defaults: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Apply defaults to a record file and print the result
    Defaults {
        /// Path to the rule catalog (toml, yaml, yml, json)
        #[arg(short, long, env = "FIELD_ENFORCE_CATALOG")]
        catalog: PathBuf,

        /// Record type name in the catalog
        #[arg(short, long)]
        record: String,

        /// Path to the record file (json, yaml, yml, toml)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Option<OutputFormat>,
    },

    /// Enforce a rule expression on a single value
    Value {
        /// The value to check
        #[arg(long, allow_hyphen_values = true)]
        value: String,

        /// Rule expression, e.g. "required between:2,10"
        #[arg(long)]
        rules: String,

        /// Kind the value is read as
        #[arg(short, long, value_enum, default_value = "text")]
        kind: ValueKind,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Kinds a bare command-line value can be read as
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum ValueKind {
    Text,
    Integer,
    Unsigned,
    Float,
    Temporal,
}

impl From<ValueKind> for FieldKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => FieldKind::Text,
            ValueKind::Integer => FieldKind::Integer,
            ValueKind::Unsigned => FieldKind::Unsigned,
            ValueKind::Float => FieldKind::Float,
            ValueKind::Temporal => FieldKind::Temporal,
        }
    }
}

/// Execute the check command
pub fn execute_check(
    catalog: PathBuf,
    record: String,
    input: PathBuf,
    defaults: bool,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<ExitCode> {
    let catalog = load_catalog(&catalog)?;
    let schema = find_record(&catalog, &record)?;
    let mut value = load_record(&input)?;

    let enforcer = Enforcer::new(catalog.enforcer.clone());
    let changed = if defaults {
        enforcer.apply_defaults_json(schema, &mut value)?
    } else {
        Vec::new()
    };

    let violations = enforcer.enforce_json(schema, &value)?;
    tracing::info!(
        record = %record,
        violations = violations.len(),
        "record checked"
    );

    if !quiet {
        EnforcementOutput::new(&record, violations.clone())
            .with_defaulted(changed)
            .render(format.unwrap_or_default())?;
    }

    Ok(ExitCode::from_violations(&violations))
}

/// Execute the defaults command
pub fn execute_defaults(
    catalog: PathBuf,
    record: String,
    input: PathBuf,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<ExitCode> {
    let catalog = load_catalog(&catalog)?;
    let schema = find_record(&catalog, &record)?;
    let mut value = load_record(&input)?;

    let changed = Enforcer::new(catalog.enforcer.clone()).apply_defaults_json(schema, &mut value)?;
    tracing::info!(record = %record, changed = changed.len(), "defaults applied");

    if !quiet {
        DefaultsOutput {
            record,
            changed,
            value,
        }
        .render(format.unwrap_or(OutputFormat::Json))?;
    }

    Ok(ExitCode::Success)
}

/// Execute the value command
pub fn execute_value(
    value: String,
    rules: String,
    kind: ValueKind,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<ExitCode> {
    let kind = FieldKind::from(kind);
    let field_value = parse_value(&value, kind)?;

    let violations = Enforcer::default().enforce_value(field_value, &rules);

    if !quiet {
        EnforcementOutput::new("value", violations.clone()).render(format.unwrap_or_default())?;
    }

    Ok(ExitCode::from_violations(&violations))
}

/// Read a command-line string as a value of `kind`
pub fn parse_value(raw: &str, kind: FieldKind) -> Result<FieldValue> {
    reconcile(kind, FieldValue::Text(raw.to_string())).map_err(|_| {
        CliError::invalid_input(format!("'{}' is not a valid {} value", raw, kind))
    })
}

fn load_catalog(path: &Path) -> Result<RuleCatalog> {
    if !path.exists() {
        return Err(CliError::file_error(format!(
            "Catalog file '{}' not found",
            path.display()
        )));
    }
    let catalog = RuleCatalog::from_path(path)?;
    tracing::debug!(path = %path.display(), records = catalog.records.len(), "catalog loaded");
    Ok(catalog)
}

fn find_record<'a>(catalog: &'a RuleCatalog, name: &str) -> Result<&'a RecordSchema> {
    catalog.record(name).ok_or_else(|| {
        CliError::catalog_error(format!("record type '{}' not found in catalog", name))
    })
}

fn load_record(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::file_error(format!(
            "Failed to read record file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_record_file(path, &content)
}

/// Parse a record file based on its extension
pub fn parse_record_file(path: &Path, content: &str) -> Result<serde_json::Value> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => Ok(serde_json::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "toml" => {
            let toml_value: toml::Value = toml::from_str(content)?;
            serde_json::to_value(toml_value)
                .map_err(|e| CliError::ParseError(format!("Conversion error: {}", e)))
        }
        _ => Err(CliError::invalid_input(format!(
            "Unsupported file format: {}. Supported formats: json, yaml, yml, toml",
            extension
        ))),
    }
}
