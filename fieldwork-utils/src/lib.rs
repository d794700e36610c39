//! Small standalone utilities for Fieldwork
//!
//! - [`WeightedRandomSelector`] picks items with probability proportional
//!   to their weight.
//! - [`find_files_with_extensions`] walks a directory tree and yields the
//!   files with matching extensions.

pub mod error;
pub mod files;
pub mod weighted;

pub use error::{Result, UtilsError};
pub use files::{ExtensionFilteredFiles, find_files_with_extensions};
pub use weighted::WeightedRandomSelector;
