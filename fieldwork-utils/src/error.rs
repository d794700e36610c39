//! Error types for the utilities.

use std::path::PathBuf;
use thiserror::Error;

/// Utility errors.
#[derive(Debug, Error)]
pub enum UtilsError {
    /// Weight of zero
    #[error("Weight must be a positive integer")]
    InvalidWeight,

    /// `add_items` called with nothing
    #[error("Items must contain at least one item")]
    NoItems,

    /// Selection from an empty selector
    #[error("You must add items before trying to get a value")]
    Empty,

    /// `get_multi` with a count of zero
    #[error("Count must be a positive integer")]
    InvalidCount,

    /// Traversal root is missing, not a directory, or unreadable
    #[error("{} is not a valid path or is not readable", .0.display())]
    InvalidPath(PathBuf),

    /// No extension to filter on
    #[error("One or more extensions must be given")]
    NoExtensions,
}

/// Result type for utility operations.
pub type Result<T> = std::result::Result<T, UtilsError>;
