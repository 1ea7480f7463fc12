//! Built-in rule evaluators
//!
//! Each evaluator is a pure function of the field value, the field name and
//! its directive, returning zero or more violation messages. Evaluators on
//! the same field never short-circuit one another.

pub mod bounds;
pub mod custom;
pub mod membership;
pub mod pattern;
pub mod required;
pub mod word_count;

use crate::config::EnforcerConfig;
use crate::directive::{Directive, DirectiveKind};
use crate::registry::CustomRegistry;
use crate::value::FieldValue;
use pattern::PatternCache;

/// Field under evaluation
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub name: &'a str,
    pub value: &'a FieldValue,
}

impl<'a> FieldRef<'a> {
    pub fn new(name: &'a str, value: &'a FieldValue) -> Self {
        Self { name, value }
    }
}

/// State shared by every directive of one enforcement call
#[derive(Debug)]
pub struct Context<'a> {
    pub config: &'a EnforcerConfig,
    pub custom: Option<&'a CustomRegistry>,
    pub patterns: PatternCache,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a EnforcerConfig, custom: Option<&'a CustomRegistry>) -> Self {
        Self {
            config,
            custom,
            patterns: PatternCache::new(config.pattern_size_limit),
        }
    }
}

/// Evaluate one directive against one field
///
/// `custom` directives resolve only when the context carries a registry;
/// without one they are skipped. Injection directives never produce
/// violations.
pub fn evaluate(directive: &Directive, field: FieldRef<'_>, ctx: &Context<'_>) -> Vec<String> {
    match directive.kind() {
        DirectiveKind::Required => required::check(field).into_iter().collect(),
        DirectiveKind::Between => bounds::between(field, directive).into_iter().collect(),
        DirectiveKind::Min => bounds::min(field, directive).into_iter().collect(),
        DirectiveKind::Max => bounds::max(field, directive).into_iter().collect(),
        DirectiveKind::Match => pattern::check(field, directive, &ctx.patterns)
            .into_iter()
            .collect(),
        DirectiveKind::Enum => membership::one_of(field, directive),
        DirectiveKind::Exclude => membership::none_of(field, directive),
        DirectiveKind::WordCount => word_count::check(field, directive).into_iter().collect(),
        DirectiveKind::Custom => match ctx.custom {
            Some(registry) => custom::check(field, directive, registry),
            None => Vec::new(),
        },
        DirectiveKind::Default | DirectiveKind::Prohibit => Vec::new(),
        DirectiveKind::Unknown if ctx.config.report_unknown => vec![format!(
            "Unknown enforcement '{}' for field '{}'",
            directive.name(),
            field.name
        )],
        DirectiveKind::Unknown => Vec::new(),
    }
}

/// Violation for a rule applied to a kind it has no meaning for
pub(crate) fn unsupported(field: FieldRef<'_>, rule: &str) -> String {
    format!(
        "Unsupported type for field '{}': {} does not apply to {} values",
        field.name,
        rule,
        field.value.kind()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &str, value: FieldValue) -> Vec<String> {
        let config = EnforcerConfig::default();
        evaluate(
            &Directive::parse(rule),
            FieldRef::new("f", &value),
            &Context::new(&config, None),
        )
    }

    #[test]
    fn test_injection_directives_are_silent() {
        assert!(run("default:5", FieldValue::Integer(0)).is_empty());
        assert!(run("prohibit", FieldValue::from("x")).is_empty());
    }

    #[test]
    fn test_custom_without_registry_is_skipped() {
        assert!(run("custom:anything", FieldValue::from("x")).is_empty());
    }

    #[test]
    fn test_unknown_directive_reported() {
        assert_eq!(
            run("minimum:3", FieldValue::from("x")),
            vec!["Unknown enforcement 'minimum' for field 'f'"]
        );

        let quiet = EnforcerConfig {
            report_unknown: false,
            ..EnforcerConfig::default()
        };
        let value = FieldValue::from("x");
        let directive = Directive::parse("minimum:3");
        let ctx = Context::new(&quiet, None);
        assert!(evaluate(&directive, FieldRef::new("f", &value), &ctx).is_empty());
    }

    #[test]
    fn test_context_shares_compiled_patterns() {
        let config = EnforcerConfig::default();
        let ctx = Context::new(&config, None);
        let directive = Directive::parse("match:^[0-9]+$");
        for raw in ["12", "x", "34"] {
            let value = FieldValue::from(raw);
            evaluate(&directive, FieldRef::new("f", &value), &ctx);
        }
        assert_eq!(ctx.patterns.compiled_count(), 1);
    }

    #[test]
    fn test_unsupported_message() {
        let value = FieldValue::Temporal(None);
        assert_eq!(
            unsupported(FieldRef::new("at", &value), "between"),
            "Unsupported type for field 'at': between does not apply to temporal values"
        );
    }
}
