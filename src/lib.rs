//! Listkeeper: state coordination for list views.
//!
//! Listkeeper is the model side of a scrolling list widget. It provides:
//! - An authoritative row collection with set/append/prepend/update/delete/clear
//! - Client-side search layered over the rows with a pluggable filter
//! - Infinite-scroll pagination gated so one page request runs at a time
//! - Pull-to-refresh that ends when fresh data settles
//! - An empty-state indicator kept in sync with the rendered rows
//!
//! Rendering, networking and decoding stay with the caller: views subscribe
//! a [`ViewBinding`](list::ViewBinding) and receive
//! [`ListChange`](list::ListChange) notifications; data arrives through the
//! coordinator's mutation methods.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  View (caller)                                      │  ← Renders rows
//! │  - reports near-end / pull / search text            │
//! └─────────────────────────────────────────────────────┘
//!          │ Event / direct calls         ▲ ListChange
//! ┌─────────────────────────────────────────────────────┐
//! │  Coordinators (list/)                               │  ← Owns state
//! │  - ListCoordinator (flat)                           │
//! │  - SectionedCoordinator (grouped)                   │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Pagination    │   │ Fetch/Refresh │   │ Search        │
//! │ - page counter│   │ - fetch gate  │   │ - query       │
//! │ - heuristic   │   │ - refresh flag│   │ - filter fn   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/)                                   │
//! │  - Error types, sections and index paths            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`list`]: Coordinators, sub-states, notifications and view bindings
//! - [`domain`]: Error types and the section model
//! - [`observability`]: Tracing subscriber setup
//!
//! # Examples
//!
//! ```rust
//! use listkeeper::list::{handle_event, ChangeLog, Event, ListChange};
//! use listkeeper::{initialize, Config};
//!
//! let config = Config {
//!     start_page: 1,
//!     page_size: 2,
//!     ..Default::default()
//! };
//! let mut list = initialize::<String>(&config);
//! let log = ChangeLog::default();
//! list.subscribe(log.clone());
//! list.set_page_handler(|list, page| {
//!     // A real handler would start a request; this one answers inline.
//!     list.append_data(vec![format!("row from page {page}")]);
//! });
//!
//! list.set_data(vec!["a".into(), "b".into()]);
//! handle_event(&mut list, &Event::NearEnd { index: 1 })?;
//!
//! assert_eq!(list.count(), 3);
//! assert!(!list.has_more());
//! assert!(log.changes().contains(&ListChange::FetchStarted { page: 2 }));
//! # Ok::<(), listkeeper::ListError>(())
//! ```

pub mod domain;
pub mod list;
pub mod observability;

pub use domain::{IndexPath, ListError, Result, Section};
pub use list::{ListCoordinator, SectionedCoordinator};

use crate::list::modes::MoreDataStrategy;
use crate::list::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_START_PAGE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Coordinator configuration.
///
/// Can be built in code, parsed from a string map (for hosts that hand
/// plugins key/value settings), or read from TOML:
///
/// ```toml
/// start_page = 1
/// page_size = 25
/// infinite_scroll = true
/// more_data = "declared-total"
/// trace_level = "debug"
/// trace_file = "/tmp/listkeeper.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First page number handed to the page handler. Default: 0
    pub start_page: u32,

    /// Rows per page, used by the full-page heuristic. Default: 20
    pub page_size: usize,

    /// Whether a page handler turns on fetch-more. Default: true
    pub infinite_scroll: bool,

    /// How "more pages exist" is decided. Default: `full-page`
    pub more_data: MoreDataStrategy,

    /// Tracing level directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Trace output file; stderr when unset.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_page: DEFAULT_START_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            infinite_scroll: true,
            more_data: MoreDataStrategy::default(),
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// Values that fail to parse fall back to their defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `start_page`: String → `u32`
    /// - `page_size`: String → `usize` (zero is rejected, falls back to 20)
    /// - `infinite_scroll`: `true`/`false`/`yes`/`no`/`1`/`0`
    /// - `more_data`: `full-page` or `declared-total`
    /// - `trace_level`, `trace_file`: taken as-is
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use listkeeper::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("start_page".to_string(), "1".to_string());
    /// map.insert("page_size".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.start_page, 1);
    /// assert_eq!(config.page_size, 20);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let start_page = config
            .get("start_page")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.start_page);

        let page_size = config
            .get("page_size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);

        let infinite_scroll = config
            .get("infinite_scroll")
            .and_then(|s| parse_flag(s))
            .unwrap_or(defaults.infinite_scroll);

        let more_data = config
            .get("more_data")
            .and_then(|s| MoreDataStrategy::from_name(s))
            .unwrap_or(defaults.more_data);

        Self {
            start_page,
            page_size,
            infinite_scroll,
            more_data,
            trace_level: config.get("trace_level").cloned(),
            trace_file: config.get("trace_file").map(PathBuf::from),
        }
    }

    /// Parses and validates TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Toml`] for malformed TOML and
    /// [`ListError::Config`] for invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading configuration");
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Config`] if `page_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ListError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Builds a flat-list coordinator from configuration.
///
/// Tracing is not installed here; call
/// [`observability::init_tracing`] once at startup if wanted.
///
/// # Example
///
/// ```rust
/// use listkeeper::{initialize, Config};
///
/// let config = Config {
///     start_page: 1,
///     ..Default::default()
/// };
///
/// let list = initialize::<u32>(&config);
/// assert_eq!(list.pagination().current_page(), 1);
/// ```
#[must_use]
pub fn initialize<T: Clone + PartialEq>(config: &Config) -> ListCoordinator<T> {
    tracing::debug!(
        start_page = config.start_page,
        page_size = config.page_size,
        more_data = ?config.more_data,
        "initializing list coordinator"
    );
    ListCoordinator::from_config(config)
}
