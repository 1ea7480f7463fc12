//! `match:<keyword|regex>`
//!
//! Keywords `email`, `phone` and `password` select built-in checks. Any
//! other argument is compiled as a regular expression and searched for in
//! the raw value (unanchored unless the pattern anchors itself). Literal
//! patterns are compiled once per enforcement call through a
//! [`PatternCache`].

use regex::{Regex, RegexBuilder};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::FieldRef;
use crate::directive::Directive;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PHONE_PATTERN: &str = r"^[0-9\-]{7,12}$";
const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{}|;:'",.<>/?"#;

static EMAIL: OnceLock<Regex> = OnceLock::new();
static PHONE: OnceLock<Regex> = OnceLock::new();

fn email() -> &'static Regex {
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).unwrap())
}

fn phone() -> &'static Regex {
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).unwrap())
}

/// Literal patterns compiled during one enforcement call
///
/// A pattern that fails to compile is remembered as `None` so it is reported
/// without being rebuilt.
#[derive(Debug)]
pub struct PatternCache {
    size_limit: usize,
    compiled: RefCell<HashMap<String, Option<Regex>>>,
}

impl PatternCache {
    pub fn new(size_limit: usize) -> Self {
        Self {
            size_limit,
            compiled: RefCell::new(HashMap::new()),
        }
    }

    /// Compiled form of `pattern`, `None` if it is not a valid expression
    pub fn get(&self, pattern: &str) -> Option<Regex> {
        if let Some(cached) = self.compiled.borrow().get(pattern) {
            return cached.clone();
        }

        let compiled = match RegexBuilder::new(pattern).size_limit(self.size_limit).build() {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid pattern");
                None
            }
        };
        self.compiled
            .borrow_mut()
            .insert(pattern.to_string(), compiled.clone());
        compiled
    }

    /// Number of distinct patterns seen
    pub fn compiled_count(&self) -> usize {
        self.compiled.borrow().len()
    }
}

pub fn check(field: FieldRef<'_>, directive: &Directive, patterns: &PatternCache) -> Option<String> {
    let raw = field.value.raw();

    match directive.args() {
        "email" => (!email().is_match(&raw))
            .then(|| format!("Field '{}' does not match email pattern", field.name)),
        "phone" => (!phone().is_match(&raw))
            .then(|| format!("Field '{}' does not match phone pattern", field.name)),
        "password" => password(field.name, &raw),
        "" => Some(format!("Invalid pattern for field '{}'", field.name)),
        pattern => match patterns.get(pattern) {
            Some(re) if re.is_match(&raw) => None,
            Some(_) => Some(format!("Field '{}' does not match pattern", field.name)),
            None => Some(format!("Invalid pattern for field '{}'", field.name)),
        },
    }
}

/// Character classes a password must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordClass {
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordClass {
    const ALL: [PasswordClass; 4] = [
        PasswordClass::Uppercase,
        PasswordClass::Lowercase,
        PasswordClass::Digit,
        PasswordClass::Special,
    ];

    fn matches(self, c: char) -> bool {
        match self {
            PasswordClass::Uppercase => c.is_ascii_uppercase(),
            PasswordClass::Lowercase => c.is_ascii_lowercase(),
            PasswordClass::Digit => c.is_ascii_digit(),
            PasswordClass::Special => SPECIAL_CHARACTERS.contains(c),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            PasswordClass::Uppercase => "one uppercase letter",
            PasswordClass::Lowercase => "one lowercase letter",
            PasswordClass::Digit => "one digit",
            PasswordClass::Special => "one special character",
        }
    }
}

/// Classes absent from `value`, in a fixed order
pub fn missing_classes(value: &str) -> Vec<PasswordClass> {
    PasswordClass::ALL
        .into_iter()
        .filter(|class| !value.chars().any(|c| class.matches(c)))
        .collect()
}

fn password(name: &str, value: &str) -> Option<String> {
    let missing = missing_classes(value);
    if missing.is_empty() {
        return None;
    }

    let wanted: Vec<&str> = missing.iter().map(|c| c.describe()).collect();
    Some(format!(
        "Field '{}' must contain at least {}",
        name,
        wanted.join(", ")
    ))
}
