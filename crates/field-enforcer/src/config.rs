//! Engine options and rule catalogs
//!
//! A [`RuleCatalog`] is the declarative side channel that attaches rule
//! expressions to fields: record type -> ordered fields -> (kind, rules).
//! It can be written in TOML, YAML or JSON:
//!
//! ```toml
//! [enforcer]
//! report_unknown = true
//!
//! [[records]]
//! name = "SignupReq"
//!
//! [[records.fields]]
//! name = "name"
//! kind = "text"
//! rules = "required between:2,10"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{EnforceError, Result};
use crate::record::RecordSchema;

/// Compiled size limit for literal `match:` patterns
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Options for an [`crate::Enforcer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforcerConfig {
    /// Report directives whose name is not a known rule
    pub report_unknown: bool,
    /// Upper bound in bytes for compiled `match:` regular expressions
    pub pattern_size_limit: usize,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            report_unknown: true,
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }
}

/// Record schemas plus engine options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub enforcer: EnforcerConfig,
    #[serde(default)]
    pub records: Vec<RecordSchema>,
}

impl RuleCatalog {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let catalog: Self = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog, picking the format from the file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(EnforceError::catalog(format!(
                "Unsupported catalog format: '{}'. Supported formats: json, yaml, yml, toml",
                extension
            ))),
        }
    }

    /// Schema for a record type
    pub fn record(&self, name: &str) -> Option<&RecordSchema> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Reject unnamed records and duplicate record or field names
    pub fn validate(&self) -> Result<()> {
        let mut record_names = HashSet::new();

        for record in &self.records {
            if record.name.trim().is_empty() {
                return Err(EnforceError::catalog("record with an empty name"));
            }
            if !record_names.insert(record.name.as_str()) {
                return Err(EnforceError::catalog(format!(
                    "duplicate record '{}'",
                    record.name
                )));
            }

            let mut field_names = HashSet::new();
            for field in &record.fields {
                if field.name.trim().is_empty() {
                    return Err(EnforceError::catalog(format!(
                        "record '{}' has a field with an empty name",
                        record.name
                    )));
                }
                if !field_names.insert(field.name.as_str()) {
                    return Err(EnforceError::catalog(format!(
                        "duplicate field '{}' in record '{}'",
                        field.name, record.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;
    use std::io::Write;

    const TOML_CATALOG: &str = r#"
[enforcer]
report_unknown = false

[[records]]
name = "SignupReq"

[[records.fields]]
name = "name"
kind = "text"
rules = "required between:2,10"

[[records.fields]]
name = "age"
kind = "integer"
rules = "between:2,10 exclude:9"

[[records.fields]]
name = "nickname"
kind = "text"
"#;

    #[test]
    fn test_default_config() {
        let config = EnforcerConfig::default();
        assert!(config.report_unknown);
        assert_eq!(config.pattern_size_limit, DEFAULT_PATTERN_SIZE_LIMIT);
    }

    #[test]
    fn test_toml_catalog() {
        let catalog = RuleCatalog::from_toml_str(TOML_CATALOG).unwrap();
        assert!(!catalog.enforcer.report_unknown);
        assert_eq!(catalog.enforcer.pattern_size_limit, DEFAULT_PATTERN_SIZE_LIMIT);

        let signup = catalog.record("SignupReq").unwrap();
        assert_eq!(signup.fields.len(), 3);
        assert_eq!(signup.fields[1].kind, FieldKind::Integer);
        assert_eq!(signup.fields[2].rules, "");
        assert!(catalog.record("Other").is_none());
    }

    #[test]
    fn test_yaml_and_json_catalogs() {
        let yaml = r#"
records:
  - name: Product
    fields:
      - name: price
        kind: unsigned
        rules: "custom:isEvenNumber"
"#;
        let catalog = RuleCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.records[0].fields[0].kind, FieldKind::Unsigned);
        assert!(catalog.enforcer.report_unknown);

        let json = r#"{"records": [{"name": "P", "fields": [{"name": "at", "kind": "temporal"}]}]}"#;
        let catalog = RuleCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.records[0].fields[0].kind, FieldKind::Temporal);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let json = r#"{"records": [{"name": "P", "fields": [
            {"name": "a", "kind": "text"}, {"name": "a", "kind": "integer"}]}]}"#;
        let err = RuleCatalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("duplicate field 'a'"));

        let json = r#"{"records": [{"name": "P"}, {"name": "P"}]}"#;
        assert!(RuleCatalog::from_json_str(json).is_err());

        let json = r#"{"records": [{"name": " "}]}"#;
        assert!(RuleCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let json = r#"{"records": [{"name": "P", "fields": [{"name": "a", "kind": "blob"}]}]}"#;
        assert!(matches!(
            RuleCatalog::from_json_str(json),
            Err(EnforceError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(TOML_CATALOG.as_bytes()).unwrap();
        let catalog = RuleCatalog::from_path(file.path()).unwrap();
        assert!(catalog.record("SignupReq").is_some());

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"records = []").unwrap();
        assert!(matches!(
            RuleCatalog::from_path(file.path()),
            Err(EnforceError::Catalog(_))
        ));
    }
}
