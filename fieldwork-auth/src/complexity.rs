// Password complexity policy

use crate::{AuthError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"[a-z]", r"[A-Z]", r"[0-9]", r"[!@#$%^&()+=]"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Requirements a password must meet
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum length in characters
    pub min_length: usize,

    /// Maximum length in characters
    pub max_length: usize,

    /// Character classes to look for
    pub patterns: Vec<Regex>,

    /// How many patterns must match
    pub min_pattern_matches: usize,
}

impl Default for PasswordPolicy {
    /// 8 to 50 characters, with 3 of: lowercase, uppercase, digit, symbol
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 50,
            patterns: DEFAULT_PATTERNS.clone(),
            min_pattern_matches: 3,
        }
    }
}

impl PasswordPolicy {
    /// Set the length window
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Replace the patterns
    pub fn patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    pub fn min_pattern_matches(mut self, count: usize) -> Self {
        self.min_pattern_matches = count;
        self
    }
}

/// Whether `password` satisfies `policy`.
///
/// A policy with fewer patterns than it requires to match is an error.
pub fn check_password_complexity(password: &str, policy: &PasswordPolicy) -> Result<bool> {
    if policy.patterns.len() < policy.min_pattern_matches {
        return Err(AuthError::InvalidPolicy {
            patterns: policy.patterns.len(),
            required: policy.min_pattern_matches,
        });
    }

    let length = password.chars().count();
    if length < policy.min_length || length > policy.max_length {
        return Ok(false);
    }

    let matches = policy
        .patterns
        .iter()
        .filter(|p| p.is_match(password))
        .count();
    Ok(matches >= policy.min_pattern_matches)
}
