// Fluent validation engine

use crate::date::{self, DEFAULT_DATE_FORMAT, DateError, Timezone};
use crate::escape::encode_html;
use crate::messages::kind;
use crate::validators::{self, FloatFlags, IpFlags, UrlFlags};
use crate::{
    DynamicValidatorRegistry, ErrorMessageCatalog, Field, FieldError, FieldErrors, NamedRule,
    Result, ValidationError, ValidatorConfig, Value,
};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Filters and validates a set of named input values.
///
/// `field()` moves a cursor onto a field; every filter and validator called
/// afterwards applies to that field, in call order. Validators other than
/// [`required`](Self::required) do nothing once the field is invalid or its
/// value is empty.
///
/// ```
/// use fieldwork_validation::{Validator, Value};
///
/// let mut v = Validator::new([("name", " John "), ("email", "not-an-email")]);
///
/// v.field("name").required(None, None)?.length(2, 50, None)?;
/// assert!(v.is_valid());
/// assert_eq!(v.get("name", true)?, &Value::from("John"));
///
/// v.field_as("email", "Email").required(None, None)?.email(None)?;
/// assert!(!v.all_valid());
/// assert_eq!(v.errors().get("email"), Some("Email is not valid"));
/// # Ok::<(), fieldwork_validation::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    current: Option<usize>,
    is_valid: bool,
    all_valid: bool,
    messages: ErrorMessageCatalog,
    registry: DynamicValidatorRegistry,
    config: ValidatorConfig,
}

impl Validator {
    /// Build a validator with the default configuration (every textual value trimmed)
    pub fn new<I, K, V>(input: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_config(input, ValidatorConfig::default())
    }

    pub fn with_config<I, K, V>(input: I, config: ValidatorConfig) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut validator = Self {
            fields: Vec::new(),
            index: HashMap::new(),
            current: None,
            is_valid: true,
            all_valid: true,
            messages: ErrorMessageCatalog::new(),
            registry: DynamicValidatorRegistry::new(),
            config,
        };

        for (name, value) in input {
            let mut field = Field::new(name, value);
            if validator.config.trim_all {
                if let Some(text) = field.value(true).as_str() {
                    let trimmed = text.trim().to_string();
                    field.set_value(trimmed);
                }
            }
            validator.insert(field);
        }

        debug!("Validator created with {} fields", validator.fields.len());
        validator
    }

    /// Build a validator from a JSON object
    pub fn from_json(input: serde_json::Value, config: ValidatorConfig) -> Result<Self> {
        match input {
            serde_json::Value::Object(map) => Ok(Self::with_config(map, config)),
            other => Err(ValidationError::InvalidInput(
                Value::from(other).type_name().to_string(),
            )),
        }
    }

    /// Replace the message catalog
    pub fn with_messages(mut self, messages: ErrorMessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Replace the named rule registry
    pub fn with_registry(mut self, registry: DynamicValidatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    fn insert(&mut self, field: Field) -> usize {
        match self.index.get(field.name()) {
            Some(&i) => {
                self.fields[i] = field;
                i
            }
            None => {
                let i = self.fields.len();
                self.index.insert(field.name().to_string(), i);
                self.fields.push(field);
                i
            }
        }
    }

    // Cursor

    /// Move the cursor to `name`, creating an empty field if needed
    pub fn field(&mut self, name: &str) -> &mut Self {
        self.field_with(name, None, Value::Null)
    }

    /// Move the cursor to `name` and set its display name
    pub fn field_as(&mut self, name: &str, display_name: &str) -> &mut Self {
        self.field_with(name, Some(display_name), Value::Null)
    }

    /// Move the cursor to `name`.
    ///
    /// `initial_value` is only used when the field does not exist yet.
    pub fn field_with(
        &mut self,
        name: &str,
        display_name: Option<&str>,
        initial_value: impl Into<Value>,
    ) -> &mut Self {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                trace!("Creating deferred field {}", name);
                self.insert(Field::new(name, initial_value))
            }
        };

        if let Some(display_name) = display_name.filter(|d| !d.is_empty()) {
            self.fields[i].set_display_name(display_name);
        }

        self.current = Some(i);
        self.is_valid = self.fields[i].is_valid();
        trace!("Cursor on field {}", name);
        self
    }

    fn current_index(&self) -> Result<usize> {
        self.current.ok_or(ValidationError::NoCurrentField)
    }

    /// Field under the cursor
    pub fn current(&self) -> Option<&Field> {
        self.current.map(|i| &self.fields[i])
    }

    fn field_ref(&self, name: &str) -> Result<&Field> {
        self.index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))
    }

    // Accessors

    pub fn get(&self, name: &str, filtered: bool) -> Result<&Value> {
        Ok(self.field_ref(name)?.value(filtered))
    }

    /// Every value, in insertion order
    pub fn get_values(&self, filtered: bool) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.value(filtered).clone()))
            .collect()
    }

    /// Every value as a JSON object
    pub fn to_json(&self, filtered: bool) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|f| (f.name().to_string(), serde_json::Value::from(f.value(filtered))))
                .collect(),
        )
    }

    /// Value under the cursor
    pub fn val(&self, filtered: bool) -> Result<&Value> {
        let i = self.current_index()?;
        Ok(self.fields[i].value(filtered))
    }

    /// HTML-encoded text of a value
    pub fn escape(&self, name: &str, filtered: bool) -> Result<String> {
        self.escape_with(name, filtered, encode_html)
    }

    pub fn escape_with<F>(&self, name: &str, filtered: bool, encoder: F) -> Result<String>
    where
        F: Fn(&str) -> String,
    {
        Ok(encoder(&self.get(name, filtered)?.to_text()))
    }

    /// Validity of the field under the cursor
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// False once any validation has failed
    pub fn all_valid(&self) -> bool {
        self.all_valid
    }

    /// Messages of every invalid field
    pub fn errors(&self) -> FieldErrors {
        FieldErrors::new(
            self.fields
                .iter()
                .filter(|f| !f.is_valid())
                .map(|f| FieldError {
                    field: f.name().to_string(),
                    message: f.error().unwrap_or_default().to_string(),
                })
                .collect(),
        )
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn messages(&self) -> &ErrorMessageCatalog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut ErrorMessageCatalog {
        &mut self.messages
    }

    pub fn registry(&self) -> &DynamicValidatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DynamicValidatorRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    // Core protocol

    /// Whether the cursor field is invalid or empty
    pub fn should_skip_validation(&self) -> Result<bool> {
        let i = self.current_index()?;
        let field = &self.fields[i];
        Ok(!field.is_valid() || field.value(true).is_empty_value())
    }

    /// Record a failure on the cursor field.
    ///
    /// A non-empty `literal` is stored verbatim; otherwise the template for
    /// `kind` is rendered with the display name followed by `params`.
    pub fn set_error_msg(
        &mut self,
        literal: Option<&str>,
        kind: &str,
        params: &[String],
    ) -> Result<()> {
        let i = self.current_index()?;
        let field = &self.fields[i];

        let message = match literal.filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => {
                let mut values = Vec::with_capacity(params.len() + 1);
                values.push(field.display_name().to_string());
                values.extend_from_slice(params);
                self.messages
                    .format(kind, &values)
                    .ok_or_else(|| ValidationError::UnknownMessageKind(kind.to_string()))?
            }
        };

        self.all_valid = false;
        self.is_valid = false;
        debug!("Field {} failed {}: {}", field.name(), kind, message);
        self.fields[i].mark_invalid(message);
        Ok(())
    }

    fn check<F>(
        &mut self,
        literal: Option<&str>,
        kind: &str,
        params: &[String],
        passes: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&Value) -> bool,
    {
        if self.should_skip_validation()? {
            return Ok(self);
        }
        let i = self.current_index()?;
        if !passes(self.fields[i].value(true)) {
            self.set_error_msg(literal, kind, params)?;
        }
        Ok(self)
    }

    fn update<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&Value) -> Value,
    {
        let i = self.current_index()?;
        let value = f(self.fields[i].value(true));
        self.fields[i].set_value(value);
        Ok(self)
    }

    // Filters

    pub fn trim(&mut self) -> Result<&mut Self> {
        let i = self.current_index()?;
        let field = &self.fields[i];
        match field.value(true) {
            Value::String(text) => {
                let trimmed = text.trim().to_string();
                self.fields[i].set_value(trimmed);
                Ok(self)
            }
            other => Err(ValidationError::NotText {
                field: field.name().to_string(),
                found: other.type_name(),
            }),
        }
    }

    pub fn to_string(&mut self) -> Result<&mut Self> {
        self.update(|v| Value::String(v.to_text()))
    }

    pub fn to_int(&mut self) -> Result<&mut Self> {
        self.update(|v| Value::Int(v.to_int()))
    }

    pub fn to_float(&mut self) -> Result<&mut Self> {
        self.update(|v| Value::Float(v.to_float()))
    }

    pub fn to_boolean(&mut self) -> Result<&mut Self> {
        self.update(|v| Value::Bool(v.to_boolean()))
    }

    /// Replace the value with `f(value)`
    pub fn filter_func<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&Value) -> Value,
    {
        self.update(f)
    }

    /// Normalize the value into a date.
    ///
    /// `format` and `timezone` default to the configured ones. Text that does
    /// not parse records a `date` failure; values that can never be dates
    /// (floats, booleans, collections) are a usage error.
    pub fn to_date_time(
        &mut self,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
    ) -> Result<&mut Self> {
        if self.should_skip_validation()? {
            return Ok(self);
        }
        let i = self.current_index()?;
        let format = self.resolve_format(format);
        let timezone = timezone.unwrap_or(self.config.default_timezone);

        match date::convert_to_date(self.fields[i].value(true), format.as_deref(), timezone) {
            Ok(date) => self.fields[i].set_value(date),
            Err(e) if e.is_data_error() => {
                trace!("Date conversion failed on {}: {}", self.fields[i].name(), e);
                self.set_error_msg(error_msg, kind::DATE, &[])?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self)
    }

    /// Replace a date (parsing text first) with its Unix timestamp
    pub fn to_unix_timestamp(
        &mut self,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
    ) -> Result<&mut Self> {
        if self.val(true)?.is_text() {
            self.to_date_time(format, timezone, error_msg)?;
        }
        let i = self.current_index()?;
        if let Some(date) = self.fields[i].value(true).as_date() {
            let timestamp = date.timestamp();
            self.fields[i].set_value(timestamp);
        }
        Ok(self)
    }

    fn resolve_format(&self, format: Option<&str>) -> Option<String> {
        format
            .map(str::to_string)
            .or_else(|| self.config.date_format.clone())
    }

    // Validators

    /// Fail when the value is empty, or fill in `default` instead.
    ///
    /// Runs even on invalid or empty fields. Any provided default is used,
    /// including empty ones such as `0`.
    pub fn required(&mut self, default: Option<Value>, error_msg: Option<&str>) -> Result<&mut Self> {
        let i = self.current_index()?;
        if self.fields[i].value(true).is_empty_value() {
            match default {
                Some(value) => self.fields[i].set_value(value),
                None => self.set_error_msg(error_msg, kind::REQUIRED, &[])?,
            }
        }
        Ok(self)
    }

    /// Character count within `[min, max]`
    pub fn length(&mut self, min: usize, max: usize, error_msg: Option<&str>) -> Result<&mut Self> {
        if self.should_skip_validation()? {
            return Ok(self);
        }
        let length = self.val(true)?.to_text().chars().count();
        if length < min {
            self.set_error_msg(error_msg, kind::MIN_LENGTH, &[min.to_string()])?;
        } else if length > max {
            self.set_error_msg(error_msg, kind::MAX_LENGTH, &[max.to_string()])?;
        }
        Ok(self)
    }

    pub fn email(&mut self, error_msg: Option<&str>) -> Result<&mut Self> {
        self.check(error_msg, kind::NOT_VALID, &[], |v| validators::is_email(&v.to_text()))
    }

    pub fn url(&mut self, flags: UrlFlags, error_msg: Option<&str>) -> Result<&mut Self> {
        self.check(error_msg, kind::URL, &[], |v| validators::is_url(&v.to_text(), flags))
    }

    pub fn ip(&mut self, flags: IpFlags, error_msg: Option<&str>) -> Result<&mut Self> {
        self.check(error_msg, kind::IP, &[], |v| validators::is_ip(&v.to_text(), flags))
    }

    pub fn float(&mut self, flags: FloatFlags, error_msg: Option<&str>) -> Result<&mut Self> {
        self.check(error_msg, kind::FLOAT, &[], |v| match v {
            Value::Float(_) | Value::Int(_) => true,
            other => validators::is_float(&other.to_text(), flags),
        })
    }

    /// One of `1 true yes on 0 false no off`
    pub fn boolean(&mut self, error_msg: Option<&str>) -> Result<&mut Self> {
        self.check(error_msg, kind::BOOLEAN, &[], |v| {
            validators::parse_boolean(v).is_some()
        })
    }

    /// Integer within `[min, max]`
    pub fn int_range(&mut self, min: i64, max: i64, error_msg: Option<&str>) -> Result<&mut Self> {
        let params = [min.to_string(), max.to_string()];
        self.check(error_msg, kind::INT_RANGE, &params, |v| {
            let parsed = match v {
                Value::Int(i) => Some(*i),
                other => validators::parse_int(&other.to_text()),
            };
            parsed.is_some_and(|i| (min..=max).contains(&i))
        })
    }

    /// Match `pattern`; an invalid pattern is a usage error even on skipped fields
    pub fn regex(&mut self, pattern: &str, error_msg: Option<&str>) -> Result<&mut Self> {
        let regex = Regex::new(pattern)?;
        self.check(error_msg, kind::NOT_VALID, &[], |v| regex.is_match(&v.to_text()))
    }

    /// Equal to the filtered value of field `other`
    pub fn match_field(&mut self, other: &str, error_msg: Option<&str>) -> Result<&mut Self> {
        let other = self.field_ref(other)?;
        let expected = other.value(true).clone();
        let params = [other.display_name().to_string()];
        self.check(error_msg, kind::NO_MATCH, &params, |v| *v == expected)
    }

    /// Member of `set`.
    ///
    /// Text and numbers compare by their textual form, so `"1"` is in `[1]`.
    pub fn one_of<I, V>(&mut self, set: I, error_msg: Option<&str>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set: Vec<Value> = set.into_iter().map(Into::into).collect();
        self.check(error_msg, kind::NOT_VALID, &[], |v| {
            set.iter().any(|candidate| loosely_equal(v, candidate))
        })
    }

    /// `predicate` must return true
    pub fn func<F>(&mut self, predicate: F, error_msg: Option<&str>) -> Result<&mut Self>
    where
        F: FnOnce(&Value) -> bool,
    {
        self.check(error_msg, kind::NOT_VALID, &[], predicate)
    }

    /// Date strictly earlier than `reference`
    pub fn before(
        &mut self,
        reference: impl Into<Value>,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
    ) -> Result<&mut Self> {
        self.compare_to_reference(reference.into(), format, timezone, error_msg, kind::BEFORE)
    }

    /// Date strictly later than `reference`
    pub fn after(
        &mut self,
        reference: impl Into<Value>,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
    ) -> Result<&mut Self> {
        self.compare_to_reference(reference.into(), format, timezone, error_msg, kind::AFTER)
    }

    /// `after(start)` then `before(end)`
    pub fn date_range(
        &mut self,
        start: impl Into<Value>,
        end: impl Into<Value>,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
    ) -> Result<&mut Self> {
        self.after(start, format, timezone, error_msg)?
            .before(end, format, timezone, error_msg)
    }

    fn compare_to_reference(
        &mut self,
        reference: Value,
        format: Option<&str>,
        timezone: Option<Timezone>,
        error_msg: Option<&str>,
        message_kind: &str,
    ) -> Result<&mut Self> {
        if self.should_skip_validation()? {
            return Ok(self);
        }
        let i = self.current_index()?;
        let field = &self.fields[i];
        let current = *field.value(true).as_date().ok_or_else(|| ValidationError::NotADate {
            field: field.name().to_string(),
        })?;

        let format = self.resolve_format(format);
        let timezone = timezone.unwrap_or(self.config.default_timezone);
        let reference_date = date::convert_to_date(&reference, format.as_deref(), timezone)
            .map_err(|e| match e {
                DateError::Unparsable { .. } | DateError::TimestampOutOfRange(_) => {
                    ValidationError::InvalidReferenceDate(reference.to_text())
                }
                other => other.into(),
            })?;

        let passes = if message_kind == kind::BEFORE {
            current < reference_date
        } else {
            current > reference_date
        };
        if !passes {
            let shown =
                date::format_date(&reference_date, format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT));
            self.set_error_msg(error_msg, message_kind, &[shown])?;
        }
        Ok(self)
    }

    /// Date strictly later than the date held by field `other`
    pub fn after_field(&mut self, other: &str, error_msg: Option<&str>) -> Result<&mut Self> {
        self.compare_to_field(other, error_msg, true)
    }

    /// Date strictly earlier than the date held by field `other`.
    ///
    /// Failures use the `afterField` message.
    pub fn before_field(&mut self, other: &str, error_msg: Option<&str>) -> Result<&mut Self> {
        self.compare_to_field(other, error_msg, false)
    }

    fn compare_to_field(
        &mut self,
        other: &str,
        error_msg: Option<&str>,
        later: bool,
    ) -> Result<&mut Self> {
        let other = self.field_ref(other)?;
        let other_date = other.value(true).as_date().copied();
        let other_name = other.name().to_string();
        let params = [other.display_name().to_string()];

        if self.should_skip_validation()? {
            return Ok(self);
        }
        let i = self.current_index()?;
        let field = &self.fields[i];
        let (current, other_date) = match (field.value(true).as_date(), other_date) {
            (Some(current), Some(other_date)) => (*current, other_date),
            (None, _) => {
                return Err(ValidationError::NotADate {
                    field: field.name().to_string(),
                });
            }
            (Some(_), None) => return Err(ValidationError::NotADate { field: other_name }),
        };

        let passes = if later {
            current > other_date
        } else {
            current < other_date
        };
        if !passes {
            self.set_error_msg(error_msg, kind::AFTER_FIELD, &params)?;
        }
        Ok(self)
    }

    /// Run the rule registered as `name`
    pub fn apply_named_rule(&mut self, name: &str, error_msg: Option<&str>) -> Result<&mut Self> {
        let rule = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownRule(name.to_string()))?;
        trace!("Applying named rule {}", name);
        self.check(error_msg, rule.error_kind(), &[], |v| rule.passes(v))
    }

    /// Register a rule and return `self` for chaining
    pub fn register_rule(&mut self, name: &str, rule: NamedRule) -> &mut Self {
        self.registry.register(name, rule);
        self
    }
}

fn loosely_equal(value: &Value, candidate: &Value) -> bool {
    let scalar = |v: &Value| matches!(v, Value::Int(_) | Value::Float(_) | Value::String(_));
    value == candidate
        || (scalar(value)
            && scalar(candidate)
            && value.is_text() != candidate.is_text()
            && value.to_text() == candidate.to_text())
}
