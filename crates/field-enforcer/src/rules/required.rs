//! `required`: the value must not be the zero value of its kind

use super::FieldRef;

pub fn check(field: FieldRef<'_>) -> Option<String> {
    if field.value.is_zero() {
        return Some(format!("Required field '{}' is not provided", field.name));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn test_required_zero_values_fail() {
        for value in [
            FieldValue::from(""),
            FieldValue::Integer(0),
            FieldValue::Unsigned(0),
            FieldValue::Float(0.0),
            FieldValue::Temporal(None),
        ] {
            assert_eq!(
                check(FieldRef::new("name", &value)),
                Some("Required field 'name' is not provided".to_string())
            );
        }
    }

    #[test]
    fn test_required_present_values_pass() {
        for value in [
            FieldValue::from(" "),
            FieldValue::Integer(-1),
            FieldValue::Float(0.1),
        ] {
            assert_eq!(check(FieldRef::new("name", &value)), None);
        }
    }
}
