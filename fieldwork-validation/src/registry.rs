// Runtime-registrable named rules

use crate::messages::kind;
use crate::{Result, Value};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type RuleFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A rule invokable by name through `Validator::apply_named_rule`
#[derive(Clone)]
pub enum NamedRule {
    /// The textual value must match `regex`
    Pattern { regex: Regex, error_kind: String },

    /// `check` must return true for the current value
    Predicate { check: RuleFn, error_kind: String },
}

impl NamedRule {
    /// Compile a pattern rule
    pub fn pattern(pattern: &str, error_kind: impl Into<String>) -> Result<Self> {
        Ok(NamedRule::Pattern {
            regex: Regex::new(pattern)?,
            error_kind: error_kind.into(),
        })
    }

    /// Wrap a predicate
    pub fn predicate<F>(check: F, error_kind: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        NamedRule::Predicate {
            check: Arc::new(check),
            error_kind: error_kind.into(),
        }
    }

    /// Message kind used when the caller gives no literal message
    pub fn error_kind(&self) -> &str {
        match self {
            NamedRule::Pattern { error_kind, .. } | NamedRule::Predicate { error_kind, .. } => {
                error_kind
            }
        }
    }

    pub(crate) fn passes(&self, value: &Value) -> bool {
        match self {
            NamedRule::Pattern { regex, .. } => regex.is_match(&value.to_text()),
            NamedRule::Predicate { check, .. } => check(value),
        }
    }
}

impl fmt::Debug for NamedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedRule::Pattern { regex, error_kind } => f
                .debug_struct("Pattern")
                .field("pattern", &regex.as_str())
                .field("error_kind", error_kind)
                .finish(),
            NamedRule::Predicate { error_kind, .. } => f
                .debug_struct("Predicate")
                .field("error_kind", error_kind)
                .finish_non_exhaustive(),
        }
    }
}

/// Registry of named rules, seeded with `alpha`, `alnum` and `noWhitespace`
#[derive(Debug, Clone)]
pub struct DynamicValidatorRegistry {
    rules: HashMap<String, NamedRule>,
}

impl DynamicValidatorRegistry {
    pub fn new() -> Self {
        let mut rules = HashMap::new();
        for (name, pattern) in [
            (kind::ALPHA, r"^[[:alpha:]]+$"),
            (kind::ALNUM, r"^[[:alnum:]]+$"),
            (kind::NO_WHITESPACE, r"^\S+$"),
        ] {
            let regex = Regex::new(pattern).expect("seed pattern is valid");
            rules.insert(
                name.to_string(),
                NamedRule::Pattern {
                    regex,
                    error_kind: name.to_string(),
                },
            );
        }
        Self { rules }
    }

    /// Registry without the seed rules
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register (or replace) a rule
    pub fn register(&mut self, name: impl Into<String>, rule: NamedRule) -> &mut Self {
        let name = name.into();
        debug!("Registered named rule {}: {:?}", name, rule);
        self.rules.insert(name, rule);
        self
    }

    /// Compile and register a pattern rule
    pub fn register_pattern(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        error_kind: impl Into<String>,
    ) -> Result<&mut Self> {
        let rule = NamedRule::pattern(pattern, error_kind)?;
        Ok(self.register(name, rule))
    }

    pub fn get(&self, name: &str) -> Option<&NamedRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<NamedRule> {
        self.rules.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Default for DynamicValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
