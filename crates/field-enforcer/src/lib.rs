//! Field Enforcer
//!
//! A declarative field-enforcement engine. Each record field carries a rule
//! expression such as `"required between:2,10"`; the engine walks the record,
//! evaluates every directive against the field's value and returns every
//! violation as a human-readable string.
//!
//! ## Features
//!
//! - **Rule grammar**: whitespace-separated directives, `name:args`, with
//!   single-quoted segments kept together
//! - **Type-aware rules**: text is bounded by length, numbers by value
//! - **Custom rules**: caller-registered evaluators resolved by name across
//!   an ordered list of maps
//! - **Default injection**: `default:<v>` and `prohibit`, including relative
//!   `timeNow+2_days` timestamps
//! - **Single-value checks**: enforce one bare value against a rule string
//! - **Rule catalogs**: record schemas loaded from TOML, YAML or JSON
//!
//! ## Architecture
//!
//! 1. **Values** (`value`, `coerce`): the closed set of field kinds and the
//!    coercion between declared and runtime kinds.
//! 2. **Records** (`record`): explicit schemas and the `Record` traits, plus
//!    an adapter for decoded JSON objects.
//! 3. **Grammar** (`directive`): rule expressions and directives.
//! 4. **Rules** (`rules/`): one evaluator per directive kind.
//! 5. **Engine** (`enforcer`, `defaults`, `registry`): the walker, the
//!    default pass and the custom registry.
//!
//! ## Example
//!
//! ```rust
//! use field_enforcer::{Enforcer, FieldKind, RecordSchema};
//! use serde_json::json;
//!
//! let schema = RecordSchema::new("SignupReq")
//!     .field("name", FieldKind::Text, "required between:2,10")
//!     .field("email", FieldKind::Text, "required match:email")
//!     .field("age", FieldKind::Integer, "between:2,10 exclude:9");
//!
//! let errors = Enforcer::default()
//!     .enforce_json(&schema, &json!({"name": "", "email": "bad", "age": 9}))
//!     .unwrap();
//! assert_eq!(errors.len(), 3);
//! ```

pub mod coerce;
pub mod config;
pub mod defaults;
pub mod directive;
pub mod enforcer;
pub mod error;
pub mod record;
pub mod registry;
pub mod rules;
pub mod value;

pub use config::{EnforcerConfig, RuleCatalog};
pub use directive::{Directive, DirectiveKind, RuleExpression};
pub use enforcer::Enforcer;
pub use error::{EnforceError, Result};
pub use record::{FieldSchema, JsonRecord, JsonRecordMut, Record, RecordMut, RecordSchema};
pub use registry::{CustomFn, CustomRegistry, CustomRules};
pub use value::{FieldKind, FieldValue};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Enforce built-in rules on a record with the default configuration
pub fn enforce<R: Record + ?Sized>(record: &R) -> Vec<String> {
    Enforcer::default().enforce(record)
}

/// Enforce built-in and custom rules with the default configuration
pub fn enforce_with_custom<R: Record + ?Sized>(record: &R, registry: &CustomRegistry) -> Vec<String> {
    Enforcer::default().enforce_with_custom(record, registry)
}

/// Apply `default` and `prohibit` directives in place
pub fn apply_defaults<R: RecordMut + ?Sized>(record: &mut R) -> Result<Vec<String>> {
    Enforcer::default().apply_defaults(record)
}

/// Enforce a rule expression on one standalone value
pub fn enforce_value(value: impl Into<FieldValue>, rules: &str) -> Vec<String> {
    Enforcer::default().enforce_value(value, rules)
}
