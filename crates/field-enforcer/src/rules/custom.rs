//! `custom:<name1,name2,...>`: caller-registered rules
//!
//! A name missing from the registry is reported as not found, which is a
//! different message from a registered rule that rejects the value.

use super::FieldRef;
use crate::directive::Directive;
use crate::registry::CustomRegistry;

pub fn check(field: FieldRef<'_>, directive: &Directive, registry: &CustomRegistry) -> Vec<String> {
    let raw = field.value.raw();
    let mut messages = Vec::new();

    for name in directive.list_args() {
        match registry.lookup(name) {
            Some(rule) => {
                if let Err(message) = rule(&raw) {
                    messages.push(if message.is_empty() {
                        format!(
                            "Field '{}' failed custom enforcement '{}'",
                            field.name, name
                        )
                    } else {
                        message
                    });
                }
            }
            None => messages.push(format!(
                "Custom enforcement '{}' not found for field '{}'",
                name, field.name
            )),
        }
    }

    messages
}
