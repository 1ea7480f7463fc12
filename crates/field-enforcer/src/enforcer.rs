//! Record walker and single-value validator
//!
//! Every field with a non-empty rule expression is coerced to its declared
//! kind and run through each of its directives. Nothing short-circuits:
//! the result is every violation, in field then directive order.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::coerce::reconcile;
use crate::config::EnforcerConfig;
use crate::defaults;
use crate::directive::RuleExpression;
use crate::error::Result;
use crate::record::{JsonRecord, JsonRecordMut, Record, RecordMut, RecordSchema};
use crate::registry::CustomRegistry;
use crate::rules::{self, Context, FieldRef};
use crate::value::{FieldKind, FieldValue};

/// The enforcement engine
///
/// Holds only its configuration; every call is independent, so a shared
/// `&Enforcer` can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Enforcer {
    config: EnforcerConfig,
}

impl Enforcer {
    pub fn new(config: EnforcerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    /// Enforce built-in rules on a record; `custom` directives are ignored
    pub fn enforce<R: Record + ?Sized>(&self, record: &R) -> Vec<String> {
        self.walk(record, None)
    }

    /// Enforce built-in rules and resolve `custom` directives in `registry`
    pub fn enforce_with_custom<R: Record + ?Sized>(
        &self,
        record: &R,
        registry: &CustomRegistry,
    ) -> Vec<String> {
        self.walk(record, Some(registry))
    }

    /// Enforce a decoded JSON object; a non-object is a contract failure
    pub fn enforce_json(&self, schema: &RecordSchema, value: &Value) -> Result<Vec<String>> {
        let record = JsonRecord::new(schema, value)?;
        Ok(self.enforce(&record))
    }

    pub fn enforce_json_with_custom(
        &self,
        schema: &RecordSchema,
        value: &Value,
        registry: &CustomRegistry,
    ) -> Result<Vec<String>> {
        let record = JsonRecord::new(schema, value)?;
        Ok(self.enforce_with_custom(&record, registry))
    }

    /// Inject defaults in place; returns the names of changed fields
    pub fn apply_defaults<R: RecordMut + ?Sized>(&self, record: &mut R) -> Result<Vec<String>> {
        self.apply_defaults_at(record, Utc::now().fixed_offset())
    }

    /// Inject defaults with `timeNow` pinned to `now`
    pub fn apply_defaults_at<R: RecordMut + ?Sized>(
        &self,
        record: &mut R,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<String>> {
        let changed = defaults::apply(record, now)?;
        tracing::debug!(
            record = %record.schema().name,
            changed = changed.len(),
            "defaults applied"
        );
        Ok(changed)
    }

    pub fn apply_defaults_json(&self, schema: &RecordSchema, value: &mut Value) -> Result<Vec<String>> {
        let mut record = JsonRecordMut::new(schema, value)?;
        self.apply_defaults(&mut record)
    }

    /// Enforce rules on one standalone value
    pub fn enforce_value(&self, value: impl Into<FieldValue>, rules: &str) -> Vec<String> {
        self.check_value(value.into(), rules, None)
    }

    pub fn enforce_value_with_custom(
        &self,
        value: impl Into<FieldValue>,
        rules: &str,
        registry: &CustomRegistry,
    ) -> Vec<String> {
        self.check_value(value.into(), rules, Some(registry))
    }

    fn check_value(
        &self,
        value: FieldValue,
        rules: &str,
        custom: Option<&CustomRegistry>,
    ) -> Vec<String> {
        let expr = RuleExpression::parse(rules);
        let kind = value.kind();
        let ctx = Context::new(&self.config, custom);
        self.check_field("", kind, value, &expr, &ctx)
            .into_iter()
            .map(|message| strip_empty_name(&message))
            .collect()
    }

    fn walk<R: Record + ?Sized>(&self, record: &R, custom: Option<&CustomRegistry>) -> Vec<String> {
        let schema = record.schema();
        let ctx = Context::new(&self.config, custom);
        let mut errors = Vec::new();

        for field in &schema.fields {
            let expr = field.expression();
            if expr.is_empty() {
                continue;
            }

            let value = record.get(&field.name).unwrap_or_else(|| {
                tracing::debug!(field = %field.name, "record has no value for field, using zero");
                field.kind.zero()
            });

            errors.extend(self.check_field(&field.name, field.kind, value, &expr, &ctx));
        }

        tracing::debug!(
            record = %schema.name,
            violations = errors.len(),
            patterns = ctx.patterns.compiled_count(),
            "record enforced"
        );
        errors
    }

    fn check_field(
        &self,
        name: &str,
        kind: FieldKind,
        value: FieldValue,
        expr: &RuleExpression,
        ctx: &Context<'_>,
    ) -> Vec<String> {
        let value = match reconcile(kind, value) {
            Ok(value) => value,
            Err(actual) => {
                tracing::debug!(field = name, expected = %kind, actual = %actual.kind(), "kind mismatch");
                return vec![format!("Field '{}' must be of kind {}", name, kind)];
            }
        };

        let mut messages = Vec::new();
        for directive in expr {
            let found = rules::evaluate(directive, FieldRef::new(name, &value), ctx);
            tracing::trace!(field = name, %directive, violations = found.len(), "directive evaluated");
            messages.extend(found);
        }
        messages
    }
}

/// Remove the `''` left by an empty field name, with the space before it
fn strip_empty_name(message: &str) -> String {
    message.replace(" ''", "").replace("''", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CustomRules;
    use serde_json::json;

    fn signup() -> RecordSchema {
        RecordSchema::new("SignupReq")
            .field("name", FieldKind::Text, "required between:2,10")
            .field("email", FieldKind::Text, "required match:email")
            .field("age", FieldKind::Integer, "between:2,10 exclude:9")
            .field("bio", FieldKind::Text, "")
    }

    #[test]
    fn test_end_to_end_signup() {
        let enforcer = Enforcer::default();
        let record = json!({"name": "", "email": "bad", "age": 9, "bio": 42});
        let errors = enforcer.enforce_json(&signup(), &record).unwrap();

        assert_eq!(
            errors,
            vec![
                "Required field 'name' is not provided",
                "Field 'email' does not match email pattern",
                "Field 'age' contains excluded value: 9",
            ]
        );
    }

    #[test]
    fn test_non_object_is_contract_failure() {
        let err = Enforcer::default()
            .enforce_json(&signup(), &json!("just a string"))
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_kind_mismatch_reported_once() {
        let errors = Enforcer::default()
            .enforce_json(&signup(), &json!({"name": "Ann", "email": "a@b.co", "age": "old"}))
            .unwrap();
        assert_eq!(errors, vec!["Field 'age' must be of kind integer"]);
    }

    #[test]
    fn test_text_numbers_are_coerced() {
        let errors = Enforcer::default()
            .enforce_json(&signup(), &json!({"name": "Ann", "email": "a@b.co", "age": "5"}))
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_enforce_ignores_custom_but_with_custom_resolves() {
        let schema = RecordSchema::new("Product")
            .field("price", FieldKind::Integer, "custom:isEvenNumber,missing");
        let record = json!({"price": 3});
        let registry = CustomRegistry::from(CustomRules::new().with("isEvenNumber", |raw| {
            match raw.parse::<i64>() {
                Ok(n) if n % 2 == 0 => Ok(()),
                _ => Err(format!("{} is not even", raw)),
            }
        }));

        let enforcer = Enforcer::default();
        assert!(enforcer.enforce_json(&schema, &record).unwrap().is_empty());
        assert_eq!(
            enforcer
                .enforce_json_with_custom(&schema, &record, &registry)
                .unwrap(),
            vec![
                "3 is not even",
                "Custom enforcement 'missing' not found for field 'price'",
            ]
        );
    }

    #[test]
    fn test_enforce_value_strips_empty_name() {
        let enforcer = Enforcer::default();
        assert_eq!(
            enforcer.enforce_value("", "required"),
            vec!["Required field is not provided"]
        );
        assert_eq!(
            enforcer.enforce_value(5i64, "enum:3,4"),
            vec!["Field does not match any enum values: 3, 4"]
        );
        assert_eq!(
            enforcer.enforce_value(FieldValue::Temporal(None), "min:1"),
            vec!["Unsupported type for field: min does not apply to temporal values"]
        );
        assert!(enforcer.enforce_value("Aa1!aaaa", "match:password").is_empty());
    }

    #[test]
    fn test_enforce_value_with_custom() {
        let registry = CustomRegistry::from(CustomRules::new().with("never", |_| Err(String::new())));
        assert_eq!(
            Enforcer::default().enforce_value_with_custom("x", "custom:never", &registry),
            vec!["Field failed custom enforcement 'never'"]
        );
    }

    #[test]
    fn test_apply_defaults_json() {
        let schema = RecordSchema::new("Product")
            .field("status", FieldKind::Text, "default:draft")
            .field("owner", FieldKind::Text, "prohibit")
            .field("stock", FieldKind::Integer, "default:5");
        let mut record = json!({"owner": "mallory", "stock": 2});

        let changed = Enforcer::default()
            .apply_defaults_json(&schema, &mut record)
            .unwrap();
        assert_eq!(changed, vec!["status", "owner"]);
        assert_eq!(record, json!({"status": "draft", "owner": "", "stock": 2}));
    }

    #[test]
    fn test_apply_defaults_json_rejects_non_object() {
        let mut value = json!([1, 2]);
        let err = Enforcer::default()
            .apply_defaults_json(&signup(), &mut value)
            .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_strip_empty_name() {
        assert_eq!(
            strip_empty_name("Custom enforcement 'x' not found for field ''"),
            "Custom enforcement 'x' not found for field"
        );
        assert_eq!(strip_empty_name("Field '' must be at least 3"), "Field must be at least 3");
        assert_eq!(
            strip_empty_name("Unsupported type for field '': min does not apply"),
            "Unsupported type for field: min does not apply"
        );
    }

    #[test]
    fn test_enforce_value_keeps_custom_spacing() {
        let registry =
            CustomRegistry::from(CustomRules::new().with("spaced", |_| Err("two  spaces ".to_string())));
        assert_eq!(
            Enforcer::default().enforce_value_with_custom("x", "custom:spaced", &registry),
            vec!["two  spaces "]
        );
    }

    #[test]
    fn test_enforce_value_quote_inside_pattern() {
        assert_eq!(
            Enforcer::default().enforce_value("O'Brien", "match:^[A-Za-z']+$ max:3"),
            vec!["Field must be at most 3 characters long"]
        );
    }

    #[test]
    fn test_enforce_value_empty_word_count() {
        assert_eq!(
            Enforcer::default().enforce_value("", "wordCount:2,3"),
            vec!["Field must be between 2 and 3 words"]
        );
    }
}
