//! Records and their schemas
//!
//! A record exposes an explicit schema (field name, kind, rule expression)
//! plus accessors. Typed structs implement [`Record`] by hand against a
//! schema built once; [`JsonRecord`] and [`JsonRecordMut`] adapt an already
//! decoded `serde_json::Value` object to the same interface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::coerce::parse_timestamp;
use crate::directive::RuleExpression;
use crate::error::{EnforceError, Result};
use crate::value::{FieldKind, FieldValue};

/// Schema entry for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    /// Rule expression; empty means the field is not enforced
    #[serde(default)]
    pub rules: String,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind, rules: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            rules: rules.into(),
        }
    }

    pub fn expression(&self) -> RuleExpression {
        RuleExpression::parse(&self.rules)
    }
}

/// Ordered field table for one record type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind, rules: impl Into<String>) -> Self {
        self.fields.push(FieldSchema::new(name, kind, rules));
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Read access to a record
pub trait Record {
    /// Field table, in walk order
    fn schema(&self) -> &RecordSchema;

    /// Current value of a field, `None` if the record has no such field
    fn get(&self, field: &str) -> Option<FieldValue>;
}

/// Write access, needed by default injection
pub trait RecordMut: Record {
    /// Replace the value of a field
    fn set(&mut self, field: &str, value: FieldValue) -> Result<()>;
}

/// Check a write against the schema before applying it
pub fn check_write(schema: &RecordSchema, field: &str, value: &FieldValue) -> Result<()> {
    let declared = schema
        .get(field)
        .ok_or_else(|| EnforceError::UnknownField(field.to_string()))?;
    if declared.kind != value.kind() {
        return Err(EnforceError::KindMismatch {
            field: field.to_string(),
            expected: declared.kind,
            actual: value.kind(),
        });
    }
    Ok(())
}

/// Read-only view of a JSON object as a record
#[derive(Debug, Clone, Copy)]
pub struct JsonRecord<'a> {
    schema: &'a RecordSchema,
    object: &'a Map<String, Value>,
}

impl<'a> JsonRecord<'a> {
    /// Wrap a decoded value; anything but an object is a contract failure
    pub fn new(schema: &'a RecordSchema, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { schema, object }),
            other => Err(not_a_record(other)),
        }
    }
}

impl Record for JsonRecord<'_> {
    fn schema(&self) -> &RecordSchema {
        self.schema
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let declared = self.schema.get(field)?;
        Some(from_json(declared.kind, self.object.get(field)))
    }
}

/// Mutable view of a JSON object as a record
#[derive(Debug)]
pub struct JsonRecordMut<'a> {
    schema: &'a RecordSchema,
    object: &'a mut Map<String, Value>,
}

impl<'a> JsonRecordMut<'a> {
    pub fn new(schema: &'a RecordSchema, value: &'a mut Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { schema, object }),
            other => Err(not_a_record(other)),
        }
    }
}

impl Record for JsonRecordMut<'_> {
    fn schema(&self) -> &RecordSchema {
        self.schema
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let declared = self.schema.get(field)?;
        Some(from_json(declared.kind, self.object.get(field)))
    }
}

impl RecordMut for JsonRecordMut<'_> {
    fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
        check_write(self.schema, field, &value)?;
        self.object.insert(field.to_string(), to_json(&value));
        Ok(())
    }
}

fn not_a_record(value: &Value) -> EnforceError {
    EnforceError::NotARecord {
        expected: "object",
        actual: json_type(value).to_string(),
    }
}

/// JSON type name used in shape errors
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read a JSON value as a field of the declared kind
///
/// Missing and `null` read as the zero value. Values that do not fit the
/// declared kind come back in their natural shape and are left for the
/// coercion layer to reconcile or report.
pub fn from_json(kind: FieldKind, value: Option<&Value>) -> FieldValue {
    let value = match value {
        None | Some(Value::Null) => return kind.zero(),
        Some(value) => value,
    };

    match (kind, value) {
        (FieldKind::Integer, Value::Number(n)) if n.is_i64() => {
            n.as_i64().map(FieldValue::Integer).unwrap_or_else(|| natural(value))
        }
        (FieldKind::Unsigned, Value::Number(n)) if n.is_u64() => {
            n.as_u64().map(FieldValue::Unsigned).unwrap_or_else(|| natural(value))
        }
        (FieldKind::Float, Value::Number(n)) => {
            n.as_f64().map(FieldValue::Float).unwrap_or_else(|| natural(value))
        }
        (FieldKind::Temporal, Value::String(s)) => match parse_timestamp(s) {
            Some(t) => FieldValue::Temporal(Some(t)),
            None => FieldValue::Text(s.clone()),
        },
        _ => natural(value),
    }
}

fn natural(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(u) = n.as_u64() {
                FieldValue::Unsigned(u)
            } else {
                FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Object(map) => FieldValue::Nested(
            map.iter()
                .map(|(k, v)| (k.clone(), natural(v)))
                .collect(),
        ),
        Value::Null => FieldValue::Text(String::new()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Write a field value back as JSON
pub fn to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Integer(i) => Value::Number((*i).into()),
        FieldValue::Unsigned(u) => Value::Number((*u).into()),
        FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        FieldValue::Temporal(Some(t)) => Value::String(t.to_rfc3339()),
        FieldValue::Temporal(None) => Value::Null,
        FieldValue::Nested(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema::new("Signup")
            .field("name", FieldKind::Text, "required")
            .field("age", FieldKind::Integer, "")
            .field("joined", FieldKind::Temporal, "")
    }

    #[test]
    fn test_json_record_rejects_non_object() {
        let schema = schema();
        let value = json!(["not", "a", "record"]);
        let err = JsonRecord::new(&schema, &value).unwrap_err();
        assert!(matches!(
            err,
            EnforceError::NotARecord { expected: "object", ref actual } if actual == "array"
        ));
    }

    #[test]
    fn test_json_record_reads_declared_kinds() {
        let schema = schema();
        let value = json!({"name": "Ann", "age": 30, "joined": "2024-01-02T00:00:00Z"});
        let record = JsonRecord::new(&schema, &value).unwrap();

        assert_eq!(record.get("name"), Some(FieldValue::from("Ann")));
        assert_eq!(record.get("age"), Some(FieldValue::Integer(30)));
        assert!(matches!(record.get("joined"), Some(FieldValue::Temporal(Some(_)))));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_missing_and_null_are_zero() {
        let schema = schema();
        let value = json!({"age": null});
        let record = JsonRecord::new(&schema, &value).unwrap();
        assert_eq!(record.get("name"), Some(FieldValue::from("")));
        assert_eq!(record.get("age"), Some(FieldValue::Integer(0)));
        assert_eq!(record.get("joined"), Some(FieldValue::Temporal(None)));
    }

    #[test]
    fn test_mismatched_json_keeps_natural_shape() {
        let schema = schema();
        let value = json!({"age": "thirty", "name": 12});
        let record = JsonRecord::new(&schema, &value).unwrap();
        assert_eq!(record.get("age"), Some(FieldValue::from("thirty")));
        assert_eq!(record.get("name"), Some(FieldValue::Integer(12)));
    }

    #[test]
    fn test_json_record_mut_writes_checked_values() {
        let schema = schema();
        let mut value = json!({});
        let mut record = JsonRecordMut::new(&schema, &mut value).unwrap();

        record.set("age", FieldValue::Integer(5)).unwrap();
        assert!(matches!(
            record.set("age", FieldValue::from("five")),
            Err(EnforceError::KindMismatch { .. })
        ));
        assert!(matches!(
            record.set("nope", FieldValue::Integer(1)),
            Err(EnforceError::UnknownField(_))
        ));

        assert_eq!(value, json!({"age": 5}));
    }
}
