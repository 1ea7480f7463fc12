//! Value set membership: `enum` and `exclude`
//!
//! Text fields compare candidates by exact string equality. Numeric fields
//! parse each candidate as the field's kind; a candidate that does not parse
//! is reported on its own and can never match, while the remaining
//! candidates are still checked.

use super::{unsupported, FieldRef};
use crate::directive::Directive;
use crate::value::FieldValue;

/// Outcome of comparing the field against one candidate
enum Candidate {
    Equal,
    Different,
    Invalid,
}

fn compare(value: &FieldValue, candidate: &str) -> Option<Candidate> {
    let outcome = match value {
        FieldValue::Text(s) => {
            if s == candidate {
                Candidate::Equal
            } else {
                Candidate::Different
            }
        }
        FieldValue::Integer(i) => match candidate.parse::<i64>() {
            Ok(c) if c == *i => Candidate::Equal,
            Ok(_) => Candidate::Different,
            Err(_) => Candidate::Invalid,
        },
        FieldValue::Unsigned(u) => match candidate.parse::<u64>() {
            Ok(c) if c == *u => Candidate::Equal,
            Ok(_) => Candidate::Different,
            Err(_) => Candidate::Invalid,
        },
        FieldValue::Float(f) => match candidate.parse::<f64>() {
            Ok(c) if c == *f => Candidate::Equal,
            Ok(_) => Candidate::Different,
            Err(_) => Candidate::Invalid,
        },
        FieldValue::Temporal(_) | FieldValue::Nested(_) => return None,
    };
    Some(outcome)
}

/// `enum:<v1,v2,...>`: the value must equal one of the candidates
pub fn one_of(field: FieldRef<'_>, directive: &Directive) -> Vec<String> {
    let candidates = directive.list_args();
    let mut messages = Vec::new();
    let mut matched = false;

    for candidate in &candidates {
        match compare(field.value, candidate) {
            None => return vec![unsupported(field, "enum")],
            Some(Candidate::Equal) => matched = true,
            Some(Candidate::Different) => {}
            Some(Candidate::Invalid) => messages.push(format!(
                "Invalid enum value '{}' for field '{}'",
                candidate, field.name
            )),
        }
    }

    if !matched {
        messages.push(format!(
            "Field '{}' does not match any enum values: {}",
            field.name,
            candidates.join(", ")
        ));
    }

    messages
}

/// `exclude:<v1,v2,...>`: the value must equal none of the candidates
pub fn none_of(field: FieldRef<'_>, directive: &Directive) -> Vec<String> {
    let mut messages = Vec::new();
    let mut excluded = false;

    for candidate in directive.list_args() {
        match compare(field.value, candidate) {
            None => return vec![unsupported(field, "exclude")],
            Some(Candidate::Equal) if !excluded => {
                excluded = true;
                messages.push(format!(
                    "Field '{}' contains excluded value: {}",
                    field.name, candidate
                ));
            }
            Some(Candidate::Equal) | Some(Candidate::Different) => {}
            Some(Candidate::Invalid) => messages.push(format!(
                "Invalid exclude value '{}' for field '{}'",
                candidate, field.name
            )),
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_of(rule: &str, value: FieldValue) -> Vec<String> {
        one_of(FieldRef::new("age", &value), &Directive::parse(rule))
    }

    fn exclude_of(rule: &str, value: FieldValue) -> Vec<String> {
        none_of(FieldRef::new("age", &value), &Directive::parse(rule))
    }

    #[test]
    fn test_enum_integer() {
        assert!(enum_of("enum:3,4", FieldValue::Integer(3)).is_empty());
        assert_eq!(
            enum_of("enum:3,4", FieldValue::Integer(5)),
            vec!["Field 'age' does not match any enum values: 3, 4"]
        );
    }

    #[test]
    fn test_enum_text_is_exact() {
        assert!(enum_of("enum:admin,user", "user".into()).is_empty());
        assert_eq!(enum_of("enum:admin,user", "User".into()).len(), 1);
    }

    #[test]
    fn test_enum_invalid_candidate_does_not_abort() {
        assert_eq!(
            enum_of("enum:x,4", FieldValue::Integer(4)),
            vec!["Invalid enum value 'x' for field 'age'"]
        );
        assert_eq!(
            enum_of("enum:x,4", FieldValue::Integer(5)),
            vec![
                "Invalid enum value 'x' for field 'age'",
                "Field 'age' does not match any enum values: x, 4",
            ]
        );
    }

    #[test]
    fn test_enum_float_and_unsigned() {
        assert!(enum_of("enum:0.5,1.5", FieldValue::Float(1.5)).is_empty());
        assert!(enum_of("enum:7", FieldValue::Unsigned(7)).is_empty());
        assert_eq!(
            enum_of("enum:-1", FieldValue::Unsigned(1)),
            vec![
                "Invalid enum value '-1' for field 'age'",
                "Field 'age' does not match any enum values: -1",
            ]
        );
    }

    #[test]
    fn test_enum_unsupported_kind() {
        let messages = enum_of("enum:a", FieldValue::Temporal(None));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Unsupported type for field 'age'"));
    }

    #[test]
    fn test_exclude() {
        assert_eq!(
            exclude_of("exclude:9", FieldValue::Integer(9)),
            vec!["Field 'age' contains excluded value: 9"]
        );
        assert!(exclude_of("exclude:9", FieldValue::Integer(8)).is_empty());
        assert_eq!(
            exclude_of("exclude:root,admin", "admin".into()),
            vec!["Field 'age' contains excluded value: admin"]
        );
    }

    #[test]
    fn test_exclude_reports_first_match_only() {
        assert_eq!(
            exclude_of("exclude:9,09", FieldValue::Integer(9)),
            vec!["Field 'age' contains excluded value: 9"]
        );
    }

    #[test]
    fn test_exclude_invalid_candidate() {
        assert_eq!(
            exclude_of("exclude:nine,8", FieldValue::Integer(8)),
            vec![
                "Invalid exclude value 'nine' for field 'age'",
                "Field 'age' contains excluded value: 8",
            ]
        );
    }
}
