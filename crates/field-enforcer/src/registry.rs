//! Custom rule registry
//!
//! Callers register domain-specific evaluators by name. A [`CustomRegistry`]
//! is an ordered stack of [`CustomRules`] maps; lookup returns the first map
//! that defines the name, so a later map never shadows an earlier one. The
//! engine only reads the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Evaluator for a custom rule: receives the raw field value and returns
/// `Err(message)` on failure
pub type CustomFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// One name-to-evaluator map
#[derive(Clone, Default)]
pub struct CustomRules {
    rules: HashMap<String, CustomFn>,
}

impl CustomRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, builder style
    pub fn with<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.insert(name, rule);
        self
    }

    /// Add or replace a rule
    pub fn insert<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
    }

    pub fn get(&self, name: &str) -> Option<&CustomFn> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CustomRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRules")
            .field("rules", &self.names())
            .finish()
    }
}

/// Ordered list of rule maps searched first-match
#[derive(Clone, Default, Debug)]
pub struct CustomRegistry {
    layers: Vec<CustomRules>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a map; it is searched after every map already present
    pub fn with(mut self, rules: CustomRules) -> Self {
        self.push(rules);
        self
    }

    pub fn push(&mut self, rules: CustomRules) {
        self.layers.push(rules);
    }

    /// First evaluator registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&CustomFn> {
        self.layers.iter().find_map(|layer| layer.get(name))
    }

    pub fn layers(&self) -> &[CustomRules] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(CustomRules::is_empty)
    }
}

impl From<CustomRules> for CustomRegistry {
    fn from(rules: CustomRules) -> Self {
        Self {
            layers: vec![rules],
        }
    }
}

impl FromIterator<CustomRules> for CustomRegistry {
    fn from_iter<I: IntoIterator<Item = CustomRules>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}
