//! Change notifications emitted to bound views.
//!
//! This module defines [`ListChange`], the fixed set of notifications a
//! coordinator emits after each mutation or state transition. Bound views
//! receive them in emission order through
//! [`ViewBinding::on_change`](crate::list::ViewBinding::on_change).
//!
//! # Ordering
//!
//! A reload emits its data change first, followed by any indicator changes
//! it caused:
//!
//! ```text
//! DataReplaced(n) → FetchSettled → Loading(false) → EmptyState(n == 0) → RefreshEnded
//! ```
//!
//! Indicator changes are only emitted when the indicator actually flips.

/// Notification describing how the rendered list changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The whole filtered view must be reloaded; it now holds `count` rows.
    ///
    /// Emitted by `set_data`, by any mutation while a search is active, and by
    /// search query changes.
    DataReplaced { count: usize },

    /// `count` rows were inserted starting at view index `start`.
    ///
    /// Only emitted while no search is active, so the view can insert rows
    /// instead of reloading.
    DataAppended { start: usize, count: usize },

    /// The row at `index` was replaced in place.
    ItemUpdated { index: usize },

    /// The row at `index` was removed.
    ItemRemoved { index: usize },

    /// All rows were removed.
    ///
    /// `reset_empty_state` tells the view whether to show its empty state.
    DataCleared { reset_empty_state: bool },

    /// The empty-state indicator should be shown or hidden.
    EmptyState { is_empty: bool },

    /// A page request was handed to the page handler.
    FetchStarted { page: u32 },

    /// The in-flight page request settled; hide the footer indicator.
    FetchSettled,

    /// Pull-to-refresh began.
    RefreshStarted,

    /// Data settled after a pull-to-refresh; end the refresh animation.
    RefreshEnded,

    /// The full-list loading indicator was shown or hidden.
    Loading { active: bool },
}

impl ListChange {
    /// Whether this change means the view's rows must be fully reconciled.
    #[must_use]
    pub const fn is_reload(&self) -> bool {
        matches!(self, Self::DataReplaced { .. } | Self::DataCleared { .. })
    }
}
