//! Type coercion between declared field kinds and runtime values
//!
//! Length-aware rules (`between`, `min`, `max`) read a [`Measure`]: text
//! fields measure character count, numeric fields their value. Temporal and
//! nested fields have no measure and those rules report them as
//! unsupported. Empty text is blank and passes every length bound.

use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

use crate::value::{FieldKind, FieldValue};

/// Absolute timestamp layout accepted by temporal defaults and text input
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Quantity compared against integer bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// Character count of a text value
    Length(usize),
    /// Integer or unsigned value, widened so both fit
    Integer(i128),
    Float(f64),
}

impl Measure {
    /// Measure a value, `None` for kinds without one
    pub fn of(value: &FieldValue) -> Option<Measure> {
        match value {
            FieldValue::Text(s) => Some(Measure::Length(s.chars().count())),
            FieldValue::Integer(i) => Some(Measure::Integer(i128::from(*i))),
            FieldValue::Unsigned(u) => Some(Measure::Integer(i128::from(*u))),
            FieldValue::Float(f) => Some(Measure::Float(*f)),
            FieldValue::Temporal(_) | FieldValue::Nested(_) => None,
        }
    }

    pub fn is_length(&self) -> bool {
        matches!(self, Measure::Length(_))
    }

    /// Empty text; length rules leave it to `required`
    pub fn is_blank(&self) -> bool {
        matches!(self, Measure::Length(0))
    }

    fn cmp_bound(&self, bound: i64) -> Option<Ordering> {
        match self {
            Measure::Length(len) => Some((*len as i128).cmp(&i128::from(bound))),
            Measure::Integer(i) => Some(i.cmp(&i128::from(bound))),
            Measure::Float(f) => f.partial_cmp(&(bound as f64)),
        }
    }

    /// Strictly below `bound`; NaN is never in range
    pub fn below(&self, bound: i64) -> bool {
        !matches!(
            self.cmp_bound(bound),
            Some(Ordering::Equal) | Some(Ordering::Greater)
        )
    }

    /// Strictly above `bound`; NaN is never in range
    pub fn above(&self, bound: i64) -> bool {
        !matches!(
            self.cmp_bound(bound),
            Some(Ordering::Equal) | Some(Ordering::Less)
        )
    }
}

/// Bring a runtime value in line with the declared kind
///
/// Text that parses as the declared kind is converted, empty text becomes
/// the zero value, and lossless numeric widenings are applied. Anything else
/// is a mismatch and hands the value back.
pub fn reconcile(declared: FieldKind, value: FieldValue) -> Result<FieldValue, FieldValue> {
    if value.kind() == declared {
        return Ok(value);
    }

    let converted = match (&value, declared) {
        (FieldValue::Text(s), kind) if s.is_empty() && kind != FieldKind::Nested => {
            Some(kind.zero())
        }
        (FieldValue::Text(s), FieldKind::Integer) => s.trim().parse().ok().map(FieldValue::Integer),
        (FieldValue::Text(s), FieldKind::Unsigned) => {
            s.trim().parse().ok().map(FieldValue::Unsigned)
        }
        (FieldValue::Text(s), FieldKind::Float) => s.trim().parse().ok().map(FieldValue::Float),
        (FieldValue::Text(s), FieldKind::Temporal) => {
            parse_timestamp(s).map(|t| FieldValue::Temporal(Some(t)))
        }
        (FieldValue::Integer(i), FieldKind::Unsigned) => {
            u64::try_from(*i).ok().map(FieldValue::Unsigned)
        }
        (FieldValue::Unsigned(u), FieldKind::Integer) => {
            i64::try_from(*u).ok().map(FieldValue::Integer)
        }
        (FieldValue::Integer(i), FieldKind::Float) => Some(FieldValue::Float(*i as f64)),
        (FieldValue::Unsigned(u), FieldKind::Float) => Some(FieldValue::Float(*u as f64)),
        _ => None,
    };

    converted.ok_or(value)
}

/// Parse an absolute timestamp
///
/// Accepts `2006-01-02 15:04:05 -07:00` (with `;` allowed in place of `:`
/// so it can live inside a directive) and RFC 3339.
pub fn parse_timestamp(input: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = input.trim().replace(';', ":");
    DateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(&normalized))
        .ok()
}

/// First run of ASCII digits in `input`, so `6chars` reads as 6
///
/// A `-` directly before the run is kept as the sign.
pub fn extract_number(input: &str) -> Option<i64> {
    let first = input.find(|c: char| c.is_ascii_digit())?;
    let end = input[first..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(input.len(), |len| first + len);
    let start = if input[..first].ends_with('-') {
        first - 1
    } else {
        first
    };
    input[start..end].parse().ok()
}
