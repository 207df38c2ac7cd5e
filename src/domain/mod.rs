//! Domain layer for list coordination.
//!
//! This module contains the types shared by every coordinator, independent of
//! any view toolkit: the crate error type and the section model used by
//! grouped lists.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`section`]: Sections, index paths and title-keyed merging
//!
//! # Examples
//!
//! ```
//! use listkeeper::domain::{IndexPath, Result, Section};
//!
//! fn first_path(sections: &[Section<u32>]) -> Result<IndexPath> {
//!     let path = IndexPath::new(0, 0);
//!     listkeeper::domain::section::check_path(sections, path)?;
//!     Ok(path)
//! }
//! ```

pub mod error;
pub mod section;

pub use error::{ListError, Result};
pub use section::{IndexPath, Section};
