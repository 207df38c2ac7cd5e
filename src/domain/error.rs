//! Error types for list coordination.
//!
//! This module defines the centralized error type [`ListError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for list coordinator operations.
///
/// Mutations that address a single row or section fail with one of the
/// lookup variants and leave the collection untouched. Configuration loading
/// wraps the underlying I/O and TOML errors using `#[from]`.
///
/// # Examples
///
/// ```
/// use listkeeper::ListError;
///
/// let err = ListError::IndexOutOfRange { index: 5, len: 3 };
/// assert_eq!(err.to_string(), "Index 5 out of range for 3 visible rows");
/// ```
#[derive(Debug, Error)]
pub enum ListError {
    /// A row index did not address a row of the currently rendered view.
    ///
    /// Raised by update and delete operations. `len` is the length of the
    /// filtered view at the time of the call.
    #[error("Index {index} out of range for {len} visible rows")]
    IndexOutOfRange {
        /// Index supplied by the caller.
        index: usize,
        /// Number of rows in the filtered view.
        len: usize,
    },

    /// No section carries the requested title.
    #[error("No section titled {0:?}")]
    SectionNotFound(Option<String>),

    /// Configuration is invalid.
    ///
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file contained malformed TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized `Result` type for list coordinator operations.
///
/// # Examples
///
/// ```
/// use listkeeper::Result;
///
/// fn remove_first() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ListError>;
