// Error message templates

use std::collections::HashMap;

/// Message kinds seeded into every catalog
pub mod kind {
    pub const REQUIRED: &str = "required";
    pub const NOT_VALID: &str = "notValid";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const INT_RANGE: &str = "intRange";
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    pub const NO_MATCH: &str = "noMatch";
    pub const URL: &str = "url";
    pub const IP: &str = "ip";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";
    pub const ALPHA: &str = "alpha";
    pub const ALNUM: &str = "alnum";
    pub const NO_WHITESPACE: &str = "noWhitespace";
    pub const DATE: &str = "date";
    pub const AFTER_FIELD: &str = "afterField";
    pub const BEFORE_FIELD: &str = "beforeField";
    pub const BEFORE: &str = "before";
    pub const AFTER: &str = "after";
}

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (kind::REQUIRED, "%s is required"),
    (kind::NOT_VALID, "%s is not valid"),
    (kind::MIN_LENGTH, "%s must be at least %d characters"),
    (kind::MAX_LENGTH, "%s must be fewer than %d characters"),
    (kind::INT_RANGE, "%s must be an integer between %d and %d"),
    (kind::MIN_VALUE, "%s must be at least %d"),
    (kind::MAX_VALUE, "%s must be %d or smaller"),
    (kind::NO_MATCH, "%s does not match the value of %s"),
    (kind::URL, "%s is not a valid URL"),
    (kind::IP, "%s is not a valid IP address"),
    (kind::FLOAT, "%s is not a valid float"),
    (kind::BOOLEAN, "%s is not a valid Boolean"),
    (kind::ALPHA, "%s may only contain the letters A-Z"),
    (kind::ALNUM, "%s may only contain A-Z and 0-9"),
    (
        kind::NO_WHITESPACE,
        "%s may not contain spaces, tabs, or other whitespace",
    ),
    (kind::DATE, "%s is not a valid date"),
    (kind::AFTER_FIELD, "%s is before %s"),
    (kind::BEFORE_FIELD, "%s is after %s"),
    (kind::BEFORE, "%s cannot be after %s"),
    (kind::AFTER, "%s cannot be before %s"),
];

/// Mapping from error kind to message template.
///
/// Templates use `%s`/`%d` placeholders filled in order with the display
/// name followed by the kind's parameters; `%1$s` style positional
/// placeholders and `%%` are understood as well.
#[derive(Debug, Clone)]
pub struct ErrorMessageCatalog {
    templates: HashMap<String, String>,
}

impl ErrorMessageCatalog {
    /// Catalog seeded with the default templates
    pub fn new() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, t)| (k.to_string(), t.to_string()))
                .collect(),
        }
    }

    /// Catalog without any template
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.templates.get(kind).map(String::as_str)
    }

    /// Override (or add) the template for `kind`
    pub fn set(&mut self, kind: impl Into<String>, template: impl Into<String>) -> &mut Self {
        self.templates.insert(kind.into(), template.into());
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.templates.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Render the template for `kind`, or `None` if the kind is unknown
    pub fn format(&self, kind: &str, params: &[String]) -> Option<String> {
        self.get(kind).map(|template| render(template, params))
    }
}

impl Default for ErrorMessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Substitute `params` into a printf-style template.
pub fn render(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut next = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        // Optional `N$` position
        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        let position = if !digits.is_empty() && chars.peek() == Some(&'$') {
            chars.next();
            digits.parse::<usize>().ok().filter(|p| *p > 0)
        } else {
            None
        };

        match chars.peek().copied() {
            Some('%') if digits.is_empty() => {
                chars.next();
                out.push('%');
            }
            Some('s' | 'd') if digits.is_empty() || position.is_some() => {
                chars.next();
                let index = match position {
                    Some(p) => p - 1,
                    None => {
                        next += 1;
                        next - 1
                    }
                };
                if let Some(param) = params.get(index) {
                    out.push_str(param);
                }
            }
            _ => {
                out.push('%');
                out.push_str(&digits);
                if position.is_some() {
                    out.push('$');
                }
            }
        }
    }

    out
}
