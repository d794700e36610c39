// Fieldwork - fluent input validation and script helpers for Rust
//
// The validator is always available; the event emitter, password helpers,
// utilities and script console are enabled through features.

// Re-export the validator
pub use fieldwork_validation::*;

// Re-export optional crates
#[cfg(feature = "events")]
pub use fieldwork_events;

#[cfg(feature = "auth")]
pub use fieldwork_auth;

#[cfg(feature = "utils")]
pub use fieldwork_utils;

#[cfg(feature = "console")]
pub use fieldwork_console;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Date, DynamicValidatorRegistry, ErrorMessageCatalog, FieldErrors, FloatFlags, IpFlags,
        NamedRule, Timezone, UrlFlags, ValidationError, Validator, ValidatorConfig, Value,
    };

    #[cfg(feature = "events")]
    pub use fieldwork_events::{EventEmitter, Observable};

    #[cfg(feature = "auth")]
    pub use fieldwork_auth::{PasswordHelper, PasswordPolicy, check_password_complexity};

    #[cfg(feature = "utils")]
    pub use fieldwork_utils::{WeightedRandomSelector, find_files_with_extensions};

    #[cfg(feature = "console")]
    pub use fieldwork_console::{ArgValue, Console};
}
