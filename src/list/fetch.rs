//! Fetch-more gate for infinite scrolling.

use super::modes::FetchStatus;

/// Gate that lets at most one page request run at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchMore {
    status: FetchStatus,
}

impl FetchMore {
    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Fetching
    }

    /// Tries to move `Idle → Fetching`.
    ///
    /// Returns `false` without changing state while a fetch is in flight,
    /// after the data source is exhausted, or when `has_more` is false.
    pub fn try_begin(&mut self, has_more: bool) -> bool {
        match self.status {
            FetchStatus::Fetching => {
                tracing::trace!("fetch already in flight, ignoring trigger");
                false
            }
            FetchStatus::Completed => {
                tracing::trace!("all pages loaded, ignoring trigger");
                false
            }
            FetchStatus::Idle if !has_more => false,
            FetchStatus::Idle => {
                self.status = FetchStatus::Fetching;
                true
            }
        }
    }

    /// Settles after data arrived.
    ///
    /// Moves to `Completed` when `exhausted`, otherwise to `Idle`. Returns
    /// whether a fetch was in flight.
    pub fn settle(&mut self, exhausted: bool) -> bool {
        let was_fetching = self.is_fetching();
        self.status = if exhausted {
            FetchStatus::Completed
        } else {
            FetchStatus::Idle
        };
        was_fetching
    }

    /// Returns to `Idle` unconditionally; reports whether a fetch was in flight.
    pub fn reset(&mut self) -> bool {
        let was_fetching = self.is_fetching();
        self.status = FetchStatus::Idle;
        was_fetching
    }
}
