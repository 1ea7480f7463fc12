//! Default injection
//!
//! Runs over a record before enforcement. `prohibit` resets a field to its
//! zero value and wins over any `default` on the same field. `default:<v>`
//! fills a field only while it holds its zero value. The first default that
//! cannot be parsed aborts the pass.
//!
//! Temporal defaults are either an absolute timestamp (see
//! [`crate::coerce::TIMESTAMP_FORMAT`]) or relative to the current time:
//!
//! ```text
//! default:timeNow
//! default:timeNow+2_days
//! default:timeNow-1_hour
//! ```

use chrono::{DateTime, Duration, FixedOffset};

use crate::coerce::{parse_timestamp, reconcile};
use crate::directive::{DirectiveKind, RuleExpression};
use crate::error::{EnforceError, Result};
use crate::record::RecordMut;
use crate::value::{FieldKind, FieldValue};

const TIME_NOW: &str = "timeNow";

/// Apply `prohibit` and `default` directives, returning changed field names
pub fn apply<R>(record: &mut R, now: DateTime<FixedOffset>) -> Result<Vec<String>>
where
    R: RecordMut + ?Sized,
{
    let fields = record.schema().fields.clone();
    let mut changed = Vec::new();

    for field in &fields {
        let expr = RuleExpression::parse(&field.rules);
        if expr.is_empty() {
            continue;
        }

        let current = record
            .get(&field.name)
            .ok_or_else(|| EnforceError::UnknownField(field.name.clone()))?;

        if expr.contains(DirectiveKind::Prohibit) {
            if !current.is_zero() || current.kind() != field.kind {
                record.set(&field.name, field.kind.zero())?;
                tracing::debug!(field = %field.name, "prohibited field reset to zero");
                changed.push(field.name.clone());
            }
            continue;
        }

        let Some(directive) = expr.find(DirectiveKind::Default) else {
            continue;
        };

        let is_zero = match reconcile(field.kind, current) {
            Ok(value) => value.is_zero(),
            Err(_) => false,
        };
        if !is_zero {
            continue;
        }

        match parse_default(field.kind, directive.args(), now) {
            Ok(Some(value)) => {
                tracing::debug!(field = %field.name, value = %value, "default applied");
                record.set(&field.name, value)?;
                changed.push(field.name.clone());
            }
            Ok(None) => {
                tracing::warn!(
                    field = %field.name,
                    kind = %field.kind,
                    "default is not supported for this field kind, skipping"
                );
            }
            Err(reason) => return Err(EnforceError::invalid_default(&field.name, reason)),
        }
    }

    Ok(changed)
}

/// Parse a default literal for a field kind
///
/// `Ok(None)` means the kind takes no defaults.
pub fn parse_default(
    kind: FieldKind,
    raw: &str,
    now: DateTime<FixedOffset>,
) -> std::result::Result<Option<FieldValue>, String> {
    let value = match kind {
        FieldKind::Text => FieldValue::Text(raw.trim().to_string()),
        FieldKind::Integer => raw
            .trim()
            .parse()
            .map(FieldValue::Integer)
            .map_err(|e| format!("failed to convert default value to int: {}", e))?,
        FieldKind::Unsigned => raw
            .trim()
            .parse()
            .map(FieldValue::Unsigned)
            .map_err(|e| format!("failed to convert default value to uint: {}", e))?,
        FieldKind::Float => raw
            .trim()
            .parse()
            .map(FieldValue::Float)
            .map_err(|e| format!("failed to convert default value to float: {}", e))?,
        FieldKind::Temporal => FieldValue::Temporal(Some(parse_temporal(raw, now)?)),
        FieldKind::Nested => return Ok(None),
    };
    Ok(Some(value))
}

/// Resolve an absolute or `timeNow`-relative temporal default
pub fn parse_temporal(
    raw: &str,
    now: DateTime<FixedOffset>,
) -> std::result::Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    let Some(shift) = raw.strip_prefix(TIME_NOW) else {
        return parse_timestamp(raw)
            .ok_or_else(|| format!("failed to convert default value to time: '{}'", raw));
    };

    if shift.is_empty() {
        return Ok(now);
    }

    let mut chars = shift.chars();
    let negative = match chars.next() {
        Some('+') => false,
        Some('-') => true,
        _ => return Err(format!("error parsing time shift '{}'", shift)),
    };
    let amount = chars.as_str();

    let mut offset = parse_shift(amount)?;
    if negative {
        offset = -offset;
    }

    now.checked_add_signed(offset)
        .ok_or_else(|| format!("time shift '{}' is out of range", shift))
}

/// `<amount>_<unit>` where unit is second, minute, hour, day, month (30
/// days) or year (365 days), singular or plural
pub fn parse_shift(shift: &str) -> std::result::Result<Duration, String> {
    let (amount, unit) = shift
        .split_once('_')
        .ok_or_else(|| format!("error parsing time shift '{}'", shift))?;

    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("error parsing time shift '{}'", shift))?;

    let unit_seconds: i64 = match unit {
        "second" | "seconds" => 1,
        "minute" | "minutes" => 60,
        "hour" | "hours" => 60 * 60,
        "day" | "days" => 24 * 60 * 60,
        "month" | "months" => 30 * 24 * 60 * 60,
        "year" | "years" => 365 * 24 * 60 * 60,
        other => return Err(format!("invalid time unit '{}'", other)),
    };

    amount
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| format!("time shift '{}' is out of range", shift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{check_write, Record, RecordSchema};
    use std::collections::HashMap;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00").unwrap()
    }

    struct MapRecord {
        schema: RecordSchema,
        values: HashMap<String, FieldValue>,
    }

    impl MapRecord {
        fn new(schema: RecordSchema) -> Self {
            let values = schema
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.kind.zero()))
                .collect();
            Self { schema, values }
        }
    }

    impl Record for MapRecord {
        fn schema(&self) -> &RecordSchema {
            &self.schema
        }

        fn get(&self, field: &str) -> Option<FieldValue> {
            self.values.get(field).cloned()
        }
    }

    impl RecordMut for MapRecord {
        fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
            check_write(&self.schema, field, &value)?;
            self.values.insert(field.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn test_defaults_fill_zero_fields() {
        let schema = RecordSchema::new("Product")
            .field("status", FieldKind::Text, "default:draft")
            .field("stock", FieldKind::Integer, "min:0 default:10")
            .field("rating", FieldKind::Float, "default:4.5")
            .field("views", FieldKind::Unsigned, "default:1");
        let mut record = MapRecord::new(schema);

        let changed = apply(&mut record, now()).unwrap();
        assert_eq!(changed, vec!["status", "stock", "rating", "views"]);
        assert_eq!(record.get("status"), Some(FieldValue::from("draft")));
        assert_eq!(record.get("stock"), Some(FieldValue::Integer(10)));
        assert_eq!(record.get("rating"), Some(FieldValue::Float(4.5)));
        assert_eq!(record.get("views"), Some(FieldValue::Unsigned(1)));
    }

    #[test]
    fn test_defaults_never_overwrite() {
        let schema = RecordSchema::new("Product").field("stock", FieldKind::Integer, "default:10");
        let mut record = MapRecord::new(schema);
        record.set("stock", FieldValue::Integer(3)).unwrap();

        assert!(apply(&mut record, now()).unwrap().is_empty());
        assert_eq!(record.get("stock"), Some(FieldValue::Integer(3)));
    }

    #[test]
    fn test_prohibit_wins_over_default() {
        let schema =
            RecordSchema::new("User").field("role", FieldKind::Text, "prohibit default:admin");
        let mut record = MapRecord::new(schema);
        record.set("role", FieldValue::from("root")).unwrap();

        assert_eq!(apply(&mut record, now()).unwrap(), vec!["role"]);
        assert_eq!(record.get("role"), Some(FieldValue::from("")));

        assert!(apply(&mut record, now()).unwrap().is_empty());
        assert_eq!(record.get("role"), Some(FieldValue::from("")));
    }

    #[test]
    fn test_first_bad_default_aborts() {
        let schema = RecordSchema::new("Product")
            .field("a", FieldKind::Text, "default:x")
            .field("b", FieldKind::Integer, "default:ten")
            .field("c", FieldKind::Text, "default:y");
        let mut record = MapRecord::new(schema);

        let err = apply(&mut record, now()).unwrap_err();
        assert!(matches!(err, EnforceError::InvalidDefault { ref field, .. } if field == "b"));
        assert_eq!(record.get("a"), Some(FieldValue::from("x")));
        assert_eq!(record.get("c"), Some(FieldValue::from("")));
    }

    #[test]
    fn test_temporal_defaults() {
        assert_eq!(parse_temporal("timeNow", now()).unwrap(), now());
        assert_eq!(
            parse_temporal("timeNow+2_days", now()).unwrap().to_rfc3339(),
            "2024-03-03T12:00:00+00:00"
        );
        assert_eq!(
            parse_temporal("timeNow-1_hour", now()).unwrap().to_rfc3339(),
            "2024-03-01T11:00:00+00:00"
        );
        assert_eq!(
            parse_temporal("timeNow+1_month", now()).unwrap().to_rfc3339(),
            "2024-03-31T12:00:00+00:00"
        );
        assert_eq!(
            parse_temporal("2023-06-01 08;30;00 +02;00", now()).unwrap().to_rfc3339(),
            "2023-06-01T08:30:00+02:00"
        );
    }

    #[test]
    fn test_temporal_default_errors() {
        assert!(parse_temporal("timeNow+2_fortnights", now())
            .unwrap_err()
            .contains("invalid time unit"));
        assert!(parse_temporal("timeNow+x_days", now())
            .unwrap_err()
            .contains("error parsing time shift"));
        assert!(parse_temporal("timeNow+2days", now()).is_err());
        assert!(parse_temporal("timeNow*2_days", now()).is_err());
        assert!(parse_temporal("next tuesday", now()).is_err());
    }

    #[test]
    fn test_temporal_default_applied_through_record() {
        let schema = RecordSchema::new("Post")
            .field("published_at", FieldKind::Temporal, "default:timeNow+1_year");
        let mut record = MapRecord::new(schema);

        apply(&mut record, now()).unwrap();
        let expected = now() + Duration::days(365);
        assert_eq!(record.get("published_at"), Some(FieldValue::Temporal(Some(expected))));
    }

    #[test]
    fn test_nested_default_is_skipped() {
        let schema = RecordSchema::new("Post").field("meta", FieldKind::Nested, "default:x");
        let mut record = MapRecord::new(schema);
        assert!(apply(&mut record, now()).unwrap().is_empty());
    }
}
