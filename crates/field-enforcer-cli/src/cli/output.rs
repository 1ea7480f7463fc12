//! Output formatting for field-enforce
//!
//! JSON, YAML and coloured table renderings of enforcement results and
//! defaulted records.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::error::{CliError, Result};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Result of enforcing one record or value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementOutput {
    /// Record type name, or `value` for single-value checks
    pub record: String,
    pub valid: bool,
    pub violation_count: usize,
    /// Violation messages in field then directive order
    pub violations: Vec<String>,
    /// Fields changed by a preceding default pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted: Vec<String>,
    pub summary: String,
}

impl EnforcementOutput {
    pub fn new(record: impl Into<String>, violations: Vec<String>) -> Self {
        let record = record.into();
        let valid = violations.is_empty();
        let summary = if valid {
            format!("{} is valid", record)
        } else {
            format!("{} has {} violation(s)", record, violations.len())
        };

        Self {
            record,
            valid,
            violation_count: violations.len(),
            violations,
            defaulted: Vec::new(),
            summary,
        }
    }

    pub fn with_defaulted(mut self, defaulted: Vec<String>) -> Self {
        self.defaulted = defaulted;
        self
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Yaml => render_yaml(self),
            OutputFormat::Table => self.render_table(),
        }
    }

    fn render_table(&self) -> Result<()> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Enforcement Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status = if self.valid { "+".green() } else { "x".red() };
        writeln!(stdout, "{} {}", status, self.summary).ok();

        if !self.defaulted.is_empty() {
            writeln!(
                stdout,
                "  {} {}",
                "Defaulted:".dimmed(),
                self.defaulted.join(", ").cyan()
            )
            .ok();
        }

        if !self.violations.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Violations:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            for (index, violation) in self.violations.iter().enumerate() {
                writeln!(
                    stdout,
                    "{} {} {}",
                    "x".red(),
                    format!("{:>3}.", index + 1).dimmed(),
                    violation
                )
                .ok();
            }
        }

        stdout.flush().ok();
        Ok(())
    }
}

/// A record after the default pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsOutput {
    pub record: String,
    /// Fields whose value was injected or reset
    pub changed: Vec<String>,
    /// The resulting record
    pub value: serde_json::Value,
}

impl DefaultsOutput {
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => render_json(&self.value),
            OutputFormat::Yaml => render_yaml(&self.value),
            OutputFormat::Table => self.render_table(),
        }
    }

    fn render_table(&self) -> Result<()> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", format!("Defaults: {}", self.record).cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();

        if self.changed.is_empty() {
            writeln!(stdout, "{} no fields changed", "-".dimmed()).ok();
        }

        if let serde_json::Value::Object(map) = &self.value {
            for (name, value) in map {
                let marker = if self.changed.iter().any(|c| c == name) {
                    "*".yellow()
                } else {
                    " ".normal()
                };
                writeln!(stdout, "{} {}: {}", marker, name.bold(), value).ok();
            }
        }

        stdout.flush().ok();
        Ok(())
    }
}

fn render_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn render_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml =
        serde_yaml::to_string(value).map_err(|e| CliError::SerializationError(e.to_string()))?;
    println!("{}", yaml);
    Ok(())
}
