//! `wordCount:<min>,<max>`
//!
//! Words are counted as the number of literal space characters plus one.
//! Tabs, newlines and runs of spaces are not collapsed, and empty text
//! counts as one word.

use super::bounds::parse_pair;
use super::FieldRef;
use crate::directive::Directive;

pub fn count_words(value: &str) -> usize {
    value.chars().filter(|c| *c == ' ').count() + 1
}

pub fn check(field: FieldRef<'_>, directive: &Directive) -> Option<String> {
    let Some((min, max)) = parse_pair(directive) else {
        return Some(format!("Invalid word count range for field '{}'", field.name));
    };

    let words = count_words(&field.value.raw()) as i128;
    if words < i128::from(min) || words > i128::from(max) {
        return Some(format!(
            "Field '{}' must be between {} and {} words",
            field.name, min, max
        ));
    }

    None
}
