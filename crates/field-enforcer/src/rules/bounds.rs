//! Length and value bounds: `between`, `min`, `max`
//!
//! Text fields are bounded by character count, numeric fields by value.
//! `between` takes exactly two integer bounds. `min` and `max` read the
//! first run of digits in their argument, so `min:6chars` bounds at 6, and
//! a `-` directly before the digits makes the bound negative.
//! Empty text is not bounded: an absent value is `required`'s concern.

use super::{unsupported, FieldRef};
use crate::coerce::{extract_number, Measure};
use crate::directive::Directive;

/// `between:<min>,<max>`, inclusive on both ends
pub fn between(field: FieldRef<'_>, directive: &Directive) -> Option<String> {
    let Some(measure) = Measure::of(field.value) else {
        return Some(unsupported(field, "between"));
    };

    let Some((min, max)) = parse_pair(directive) else {
        return Some(format!("Invalid range values for field '{}'", field.name));
    };

    if measure.is_blank() {
        return None;
    }

    if measure.below(min) || measure.above(max) {
        let unit = if measure.is_length() { " characters" } else { "" };
        return Some(format!(
            "Field '{}' must be between {} and {}{}",
            field.name, min, max, unit
        ));
    }

    None
}

/// `min:<n>`
pub fn min(field: FieldRef<'_>, directive: &Directive) -> Option<String> {
    let Some(measure) = Measure::of(field.value) else {
        return Some(unsupported(field, "min"));
    };

    let Some(bound) = extract_number(directive.args()) else {
        return Some(format!("Invalid minimum value for field '{}'", field.name));
    };

    if measure.is_blank() {
        return None;
    }

    if measure.below(bound) {
        return Some(if measure.is_length() {
            format!(
                "Field '{}' must be at least {} characters long",
                field.name, bound
            )
        } else {
            format!("Field '{}' must be at least {}", field.name, bound)
        });
    }

    None
}

/// `max:<n>`
pub fn max(field: FieldRef<'_>, directive: &Directive) -> Option<String> {
    let Some(measure) = Measure::of(field.value) else {
        return Some(unsupported(field, "max"));
    };

    let Some(bound) = extract_number(directive.args()) else {
        return Some(format!("Invalid maximum value for field '{}'", field.name));
    };

    if measure.is_blank() {
        return None;
    }

    if measure.above(bound) {
        return Some(if measure.is_length() {
            format!(
                "Field '{}' must be at most {} characters long",
                field.name, bound
            )
        } else {
            format!("Field '{}' must be at most {}", field.name, bound)
        });
    }

    None
}

/// Exactly two integer arguments
pub(crate) fn parse_pair(directive: &Directive) -> Option<(i64, i64)> {
    match directive.list_args().as_slice() {
        [low, high] => Some((low.parse().ok()?, high.parse().ok()?)),
        _ => None,
    }
}
