//! State enums for the fetch-more state machine and end-of-data detection.
//!
//! # State Machine
//!
//! ```text
//! Idle --trigger(has more)--> Fetching --settle--> Idle
//!                                 │
//!                                 └--settle(declared total reached)--> Completed
//! ```
//!
//! Any reload (`set_data`, `clear_data`, pull-to-refresh) returns the status
//! to [`FetchStatus::Idle`].

use serde::Deserialize;

/// Status of the infinite-scroll fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No page request is in flight; a near-end signal may start one.
    #[default]
    Idle,

    /// A page request was handed to the page handler and has not settled.
    ///
    /// Further near-end signals are ignored until data arrives or the caller
    /// reports the failure.
    Fetching,

    /// The caller-declared total has been reached; no more pages exist.
    ///
    /// Only entered under [`MoreDataStrategy::DeclaredTotal`].
    Completed,
}

/// How the coordinator decides whether another page exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoreDataStrategy {
    /// A batch of at least `page_size` rows implies more may follow.
    ///
    /// A final page of exactly `page_size` rows costs one extra, empty fetch.
    #[default]
    FullPage,

    /// The caller declares the total row count with `set_total_count`.
    ///
    /// More pages exist while the row collection is shorter than the total.
    /// With no total declared, falls back to [`MoreDataStrategy::FullPage`].
    DeclaredTotal,
}

impl MoreDataStrategy {
    /// Parses the names accepted in string-map configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "full-page" | "full_page" | "heuristic" => Some(Self::FullPage),
            "declared-total" | "declared_total" | "total" => Some(Self::DeclaredTotal),
            _ => None,
        }
    }
}
