//! Fluent input validation for Fieldwork
//!
//! Filters and validates a map of submitted values one field at a time.
//! Failed checks are recorded on the field and reported through
//! [`Validator::errors`]; mistakes in the calling code (unknown fields,
//! unregistered rules, comparing values that are not dates) are returned as
//! [`ValidationError`].
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use fieldwork_validation::Validator;
//!
//! let mut v = Validator::new([("age", ""), ("email", "ann@example.com")]);
//!
//! v.field_as("age", "Age").required(None, None)?.int_range(1, 120, None)?;
//! v.field("email").required(None, None)?.email(None)?;
//!
//! assert!(!v.all_valid());
//! assert_eq!(v.errors().get("age"), Some("Age is required"));
//! # Ok::<(), fieldwork_validation::ValidationError>(())
//! ```
//!
//! ## Dates
//!
//! ```
//! use fieldwork_validation::Validator;
//!
//! let mut v = Validator::new([("date", "06/15/2021")]);
//!
//! v.field("date")
//!     .to_date_time(Some("m/d/Y"), None, None)?
//!     .date_range("01/01/2020", "12/31/2020", Some("m/d/Y"), None, None)?;
//!
//! assert_eq!(v.errors().get("date"), Some("Date cannot be after 12/31/2020"));
//! # Ok::<(), fieldwork_validation::ValidationError>(())
//! ```
//!
//! ## Named Rules
//!
//! ```
//! use fieldwork_validation::Validator;
//!
//! let mut v = Validator::new([("pin", "12a4")]);
//! v.registry_mut().register_pattern("digits", "^[0-9]+$", "notValid")?;
//!
//! v.field_as("pin", "PIN").apply_named_rule("digits", None)?;
//! assert_eq!(v.errors().get("pin"), Some("PIN is not valid"));
//! # Ok::<(), fieldwork_validation::ValidationError>(())
//! ```

mod config;
pub mod date;
mod error;
mod escape;
mod field;
pub mod messages;
mod registry;
mod validator;
pub mod validators;
mod value;

pub use config::ValidatorConfig;
pub use date::{DateError, Timezone, convert_to_date, format_date};
pub use error::*;
pub use escape::encode_html;
pub use field::Field;
pub use messages::ErrorMessageCatalog;
pub use registry::{DynamicValidatorRegistry, NamedRule};
pub use validator::Validator;
pub use validators::{FloatFlags, IpFlags, UrlFlags};
pub use value::{Date, Value};
