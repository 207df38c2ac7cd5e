//! View intent handling.
//!
//! This module translates the intents a view reports (scrolling near the
//! end, pulling to refresh, typing search text) into coordinator calls.
//! Views that already hold `&mut ListCoordinator` may call the coordinator
//! directly; [`handle_event`] exists for views that forward input as data,
//! for example through a channel drained by the owning event loop.
//!
//! # Architecture
//!
//! 1. The view binding reports an [`Event`]
//! 2. [`handle_event`] pattern-matches the event type
//! 3. Coordinator operations mutate state and emit changes
//! 4. The returned flag tells the caller whether anything changed
//!
//! # Example
//!
//! ```rust
//! use listkeeper::list::{handle_event, Event, ListCoordinator};
//!
//! let mut list: ListCoordinator<u32> = ListCoordinator::default();
//! list.set_data(vec![1, 2, 3]);
//!
//! let changed = handle_event(&mut list, &Event::RowDeleted { index: 0 })?;
//! assert!(changed);
//! assert_eq!(list.rows(), &[2, 3]);
//! # Ok::<(), listkeeper::ListError>(())
//! ```

use super::state::ListCoordinator;
use crate::domain::error::Result;

/// Intents reported by a bound view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The view is about to render the row at `index`.
    NearEnd {
        /// Rendered row index.
        index: usize,
    },

    /// The user pulled to refresh.
    PullToRefresh,

    /// The search text changed.
    ///
    /// Not debounced; views that emit on every keystroke should rate-limit
    /// upstream if filtering is expensive.
    SearchTextChanged(String),

    /// The search was dismissed; the full row collection is shown again.
    SearchCancelled,

    /// The caller's page request failed and will not deliver data.
    FetchFailed,

    /// The user deleted the rendered row at `index` (swipe to delete).
    RowDeleted {
        /// Rendered row index.
        index: usize,
    },
}

/// Applies a view intent to the coordinator.
///
/// Returns whether the event changed coordinator state. Near-end signals
/// that do not start a fetch, and pull-to-refresh without a refresh handler,
/// return `false`.
///
/// # Errors
///
/// Returns [`ListError::IndexOutOfRange`](crate::ListError::IndexOutOfRange)
/// when a `RowDeleted` index does not address a rendered row.
pub fn handle_event<T: Clone + PartialEq>(list: &mut ListCoordinator<T>, event: &Event) -> Result<bool> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::NearEnd { index } => Ok(list.near_end(*index)),
        Event::PullToRefresh => Ok(list.pull_to_refresh()),
        Event::SearchTextChanged(query) => {
            if query == list.search_query() {
                tracing::trace!("search text unchanged");
                return Ok(false);
            }
            list.set_search_query(query.as_str());
            Ok(true)
        }
        Event::SearchCancelled => {
            if !list.is_searching() {
                return Ok(false);
            }
            tracing::debug!(query = %list.search_query(), "search cancelled");
            list.set_search_query("");
            Ok(true)
        }
        Event::FetchFailed => Ok(list.fetch_failed()),
        Event::RowDeleted { index } => {
            list.delete_data(*index)?;
            Ok(true)
        }
    }
}
