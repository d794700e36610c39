// Field state

use crate::Value;

/// One named input value through its filter/validation lifecycle.
///
/// The original value is kept untouched; filters only rewrite the current
/// value. Validity only ever moves from valid to invalid, and the first
/// recorded message is the one that sticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    display_name: String,
    original_value: Value,
    value: Value,
    valid: bool,
    error: Option<String>,
}

impl Field {
    /// Create a field; the display name defaults to the capitalized name
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        Self {
            display_name: capitalize(&name),
            original_value: value.clone(),
            value,
            name,
            valid: true,
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value when `filtered`, otherwise the value as first provided
    pub fn value(&self, filtered: bool) -> &Value {
        if filtered {
            &self.value
        } else {
            &self.original_value
        }
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark the field invalid with `message`.
    ///
    /// Only the first call records its message; later calls leave the
    /// stored error untouched and return `false`.
    pub fn mark_invalid(&mut self, message: impl Into<String>) -> bool {
        self.valid = false;
        if self.error.is_some() {
            return false;
        }
        self.error = Some(message.into());
        true
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_defaults_to_capitalized_name() {
        assert_eq!(Field::new("email", "a@b.c").display_name(), "Email");
        assert_eq!(Field::new("", Value::Null).display_name(), "");
        assert_eq!(Field::new("émile", Value::Null).display_name(), "Émile");
    }

    #[test]
    fn test_filtered_and_original_values() {
        let mut field = Field::new("name", " John ");
        field.set_value("John");

        assert_eq!(field.value(true), &Value::from("John"));
        assert_eq!(field.value(false), &Value::from(" John "));
    }

    #[test]
    fn test_first_error_wins() {
        let mut field = Field::new("age", Value::Null);
        assert!(field.is_valid());

        assert!(field.mark_invalid("Age is required"));
        assert!(!field.mark_invalid("Age must be an integer between 1 and 3"));

        assert!(!field.is_valid());
        assert_eq!(field.error(), Some("Age is required"));
    }

    #[test]
    fn test_set_display_name() {
        let mut field = Field::new("dob", Value::Null);
        field.set_display_name("Date of birth");
        assert_eq!(field.display_name(), "Date of birth");
    }
}
