//! Rule expression grammar
//!
//! A rule expression is a whitespace-separated list of directives, each of
//! the form `name` or `name:args`. Only the first `:` splits name from
//! arguments. Argument syntax belongs to the rule that owns the directive,
//! so nothing is rejected here; malformed arguments are reported by the
//! evaluator for that field.
//!
//! An argument that starts with `'` directly after the `:` runs to the next
//! `'` followed by whitespace or the end of the expression, keeping its
//! whitespace. This is how a default containing spaces is written:
//!
//! ```text
//! required default:'2024-01-02 10;00;00 +00;00'
//! ```
//!
//! Any other `'` is an ordinary character, so `match:^[A-Za-z']+$` needs no
//! quoting.

use std::fmt;

/// Directive kinds known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Required,
    Between,
    Min,
    Max,
    Match,
    Enum,
    Exclude,
    WordCount,
    Custom,
    Default,
    Prohibit,
    Unknown,
}

impl DirectiveKind {
    /// Resolve a directive name; names are case-sensitive
    pub fn from_name(name: &str) -> Self {
        match name {
            "required" => DirectiveKind::Required,
            "between" => DirectiveKind::Between,
            "min" => DirectiveKind::Min,
            "max" => DirectiveKind::Max,
            "match" => DirectiveKind::Match,
            "enum" => DirectiveKind::Enum,
            "exclude" => DirectiveKind::Exclude,
            "wordCount" => DirectiveKind::WordCount,
            "custom" => DirectiveKind::Custom,
            "default" => DirectiveKind::Default,
            "prohibit" => DirectiveKind::Prohibit,
            _ => DirectiveKind::Unknown,
        }
    }

    /// Directives consumed by default injection rather than enforcement
    pub fn is_injection(self) -> bool {
        matches!(self, DirectiveKind::Default | DirectiveKind::Prohibit)
    }
}

/// One `name[:args]` unit of a rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    args: Option<String>,
    kind: DirectiveKind,
}

impl Directive {
    /// Split a single token into name and arguments
    pub fn parse(token: &str) -> Self {
        let (name, args) = match token.split_once(':') {
            Some((name, args)) => (name, Some(args.to_string())),
            None => (token, None),
        };
        Self {
            name: name.to_string(),
            args,
            kind: DirectiveKind::from_name(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    /// Raw argument string, empty when the directive has no `:`
    pub fn args(&self) -> &str {
        self.args.as_deref().unwrap_or("")
    }

    /// Arguments split on `,`
    ///
    /// `between` yields `[""]` and `between:1` yields `["1"]`, so count
    /// checks in evaluators see the malformed shape.
    pub fn list_args(&self) -> Vec<&str> {
        self.args().split(',').collect()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => write!(f, "{}:{}", self.name, args),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Ordered directives attached to one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleExpression {
    directives: Vec<Directive>,
}

impl RuleExpression {
    /// Parse a rule expression. Never fails.
    pub fn parse(expr: &str) -> Self {
        let directives = tokenize(expr)
            .into_iter()
            .map(|token| Directive::parse(&token))
            .collect();
        Self { directives }
    }

    /// An empty expression means the field is not enforced at all
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    /// First directive of the given kind
    pub fn find(&self, kind: DirectiveKind) -> Option<&Directive> {
        self.directives.iter().find(|d| d.kind() == kind)
    }

    pub fn contains(&self, kind: DirectiveKind) -> bool {
        self.find(kind).is_some()
    }
}

impl<'a> IntoIterator for &'a RuleExpression {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

impl From<&str> for RuleExpression {
    fn from(expr: &str) -> Self {
        RuleExpression::parse(expr)
    }
}

fn tokenize(expr: &str) -> Vec<String> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' && current.ends_with(':') {
            if let Some(end) = closing_quote(&chars, i + 1) {
                current.extend(&chars[i + 1..end]);
                i = end + 1;
                continue;
            }
        }

        if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
        i += 1;
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Index of the `'` closing a quoted argument that opens before `start`
fn closing_quote(chars: &[char], start: usize) -> Option<usize> {
    (start..chars.len())
        .find(|&j| chars[j] == '\'' && chars.get(j + 1).map_or(true, |c| c.is_whitespace()))
}
