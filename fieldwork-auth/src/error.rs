// Error types for password handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Cost must be an integer in the range 4-31, got {0}")]
    InvalidCost(u32),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Password verification error: {0}")]
    PasswordVerifyError(String),

    #[error("Cannot build a random string from an empty character set")]
    EmptyCharset,

    #[error("The policy has {patterns} patterns but requires {required} matches")]
    InvalidPolicy { patterns: usize, required: usize },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;
