//! Validator configuration.

use crate::date::{DEFAULT_DATE_FORMAT, Timezone};
use tracing::warn;

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Trim every textual input value on construction (FIELDWORK_TRIM_ALL).
    pub trim_all: bool,
    /// Timezone for formatted dates without an offset (FIELDWORK_TIMEZONE).
    pub default_timezone: Timezone,
    /// Date format used when a date filter or validator is given none
    /// (FIELDWORK_DATE_FORMAT). `None` falls back to free-form parsing.
    pub date_format: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            trim_all: true,
            default_timezone: Timezone::Utc,
            date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
        }
    }
}

impl ValidatorConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let trim_all = lookup("FIELDWORK_TRIM_ALL")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.trim_all);

        let default_timezone = match lookup("FIELDWORK_TIMEZONE") {
            Some(tz) => tz.parse().unwrap_or_else(|e| {
                warn!("Ignoring FIELDWORK_TIMEZONE: {}", e);
                defaults.default_timezone
            }),
            None => defaults.default_timezone,
        };

        let date_format = match lookup("FIELDWORK_DATE_FORMAT") {
            Some(format) if format.trim().is_empty() => None,
            Some(format) => Some(format),
            None => defaults.date_format,
        };

        Self {
            trim_all,
            default_timezone,
            date_format,
        }
    }

    /// Enable or disable trimming of textual input.
    pub fn trim_all(mut self, trim_all: bool) -> Self {
        self.trim_all = trim_all;
        self
    }

    /// Set the default timezone.
    pub fn default_timezone(mut self, timezone: Timezone) -> Self {
        self.default_timezone = timezone;
        self
    }

    /// Set the default date format.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Parse dates free-form when no format is given.
    pub fn free_form_dates(mut self) -> Self {
        self.date_format = None;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert!(config.trim_all);
        assert_eq!(config.default_timezone, Timezone::Utc);
        assert_eq!(config.date_format.as_deref(), Some("m/d/Y"));
    }

    #[test]
    fn test_from_lookup() {
        let config = ValidatorConfig::from_lookup(lookup(&[
            ("FIELDWORK_TRIM_ALL", "off"),
            ("FIELDWORK_TIMEZONE", "+01:00"),
            ("FIELDWORK_DATE_FORMAT", "Y-m-d"),
        ]));

        assert!(!config.trim_all);
        assert_eq!(config.default_timezone, "+01:00".parse().unwrap());
        assert_eq!(config.date_format.as_deref(), Some("Y-m-d"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ValidatorConfig::from_lookup(lookup(&[
            ("FIELDWORK_TRIM_ALL", "sometimes"),
            ("FIELDWORK_TIMEZONE", "Nowhere/Special"),
            ("FIELDWORK_DATE_FORMAT", ""),
        ]));

        assert!(config.trim_all);
        assert_eq!(config.default_timezone, Timezone::Utc);
        assert_eq!(config.date_format, None);
    }

    #[test]
    fn test_builder() {
        let config = ValidatorConfig::default()
            .trim_all(false)
            .default_timezone(Timezone::Local)
            .free_form_dates();

        assert!(!config.trim_all);
        assert_eq!(config.default_timezone, Timezone::Local);
        assert!(config.date_format.is_none());
    }
}
