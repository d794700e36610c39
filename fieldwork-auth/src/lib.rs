//! Password utilities for Fieldwork
//!
//! Bcrypt hashing and verification, random strings and passwords, and
//! configurable complexity checks.
//!
//! # Examples
//!
//! ```
//! use fieldwork_auth::{PasswordHelper, PasswordPolicy, check_password_complexity};
//!
//! let hash = PasswordHelper::generate_hash("s3cret-Pass", 4)?;
//! assert!(PasswordHelper::compare_to_hash("s3cret-Pass", &hash)?);
//!
//! let password = PasswordHelper::generate_random_password(12);
//! assert_eq!(password.chars().count(), 12);
//!
//! assert!(check_password_complexity("s3cret-Pass", &PasswordPolicy::default())?);
//! # Ok::<(), fieldwork_auth::AuthError>(())
//! ```

mod complexity;
mod error;
mod password;

pub use complexity::{PasswordPolicy, check_password_complexity};
pub use error::{AuthError, Result};
pub use password::{
    DEFAULT_COST, DEFAULT_PASSWORD_LENGTH, MAX_COST, MIN_COST, PasswordHelper, UNAMBIGUOUS_CHARS,
};
