//! The list-state coordinator.
//!
//! This module defines [`ListCoordinator`], the single owner of a flat list's
//! rows. It holds the authoritative row collection, the derived filtered
//! view, the pagination counter, the fetch-more gate and the refresh state,
//! and notifies subscribed [`ViewBinding`]s after every change.
//!
//! # State Components
//!
//! - **Rows**: the authoritative row collection, in display order
//! - **Filtered view**: `None` while it is identical to the rows, otherwise the
//!   filter function's output for the current query
//! - **Pagination**: page counter and full-page heuristic
//! - **Fetch-more gate**: at most one page request in flight
//! - **Refresh**: whether a pull-to-refresh is waiting for data
//! - **Indicators**: last reported empty state and loading indicator
//!
//! # Re-entrancy
//!
//! Bindings and handlers receive `&mut ListCoordinator` and may call any
//! operation. Changes emitted while a dispatch is running are queued and
//! delivered in order once the current change has reached every binding, so
//! no binding observes a change out of order and no collection is iterated
//! while it is being mutated.
//!
//! # Example
//!
//! ```rust
//! use listkeeper::list::{ChangeLog, ListChange, ListCoordinator, Pagination};
//!
//! let log = ChangeLog::default();
//! let mut list: ListCoordinator<&str> = ListCoordinator::new(Pagination::new(1, 2));
//! list.subscribe(log.clone());
//! list.set_page_handler(|_list, page| {
//!     println!("fetch page {page}");
//! });
//!
//! list.append_data(vec!["a", "b"]);
//! assert!(list.has_more());
//! assert!(list.near_end(1));
//! assert_eq!(list.pagination().current_page(), 2);
//! ```

use super::binding::ViewBinding;
use super::changes::ListChange;
use super::fetch::FetchMore;
use super::modes::{FetchStatus, MoreDataStrategy};
use super::pagination::Pagination;
use super::refresh::Refresh;
use super::search::{FilterFn, SearchFilter};
use crate::domain::error::{ListError, Result};
use std::collections::{HashSet, VecDeque};

/// Page handler: receives the coordinator and the page number to fetch.
///
/// The handler starts the request and returns; the result is delivered later
/// through `append_data` (or `fetch_failed`).
pub type PageHandler<T> = Box<dyn FnMut(&mut ListCoordinator<T>, u32)>;

/// Refresh handler: invoked on pull-to-refresh.
///
/// It must itself deliver fresh data with `set_data` or `clear_data`.
pub type RefreshHandler<T> = Box<dyn FnMut(&mut ListCoordinator<T>)>;

/// Handle returned by [`ListCoordinator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

impl BindingId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Owner of a flat list's rows, search, pagination and view notifications.
///
/// All calls must be serialized by the caller, typically by driving the
/// coordinator from one event loop. It never blocks and never performs I/O.
pub struct ListCoordinator<T> {
    rows: Vec<T>,
    filtered: Option<Vec<T>>,
    search: SearchFilter<T>,
    pagination: Pagination,
    infinite_scroll: bool,
    fetch: FetchMore,
    refresh: Refresh,
    more_data: MoreDataStrategy,
    total_count: Option<usize>,
    has_more: bool,
    loading: bool,
    empty_reported: Option<bool>,
    bindings: Vec<(BindingId, Box<dyn ViewBinding<T>>)>,
    live_bindings: HashSet<BindingId>,
    removed_bindings: Vec<BindingId>,
    next_binding: u64,
    pending: VecDeque<ListChange>,
    dispatching: bool,
    page_handler: Option<PageHandler<T>>,
    refresh_handler: Option<RefreshHandler<T>>,
}

impl<T: Clone + PartialEq> Default for ListCoordinator<T> {
    fn default() -> Self {
        Self::new(Pagination::default())
    }
}

impl<T> std::fmt::Debug for ListCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListCoordinator")
            .field("rows", &self.rows.len())
            .field("visible", &self.filtered.as_ref().map_or(self.rows.len(), Vec::len))
            .field("search", &self.search)
            .field("pagination", &self.pagination)
            .field("fetch", &self.fetch.status())
            .field("has_more", &self.has_more)
            .field("refreshing", &self.refresh.is_active())
            .field("bindings", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq> ListCoordinator<T> {
    /// Creates an empty coordinator with the given page counter.
    ///
    /// Infinite scroll is allowed but stays inactive until a page handler is
    /// installed.
    #[must_use]
    pub fn new(pagination: Pagination) -> Self {
        Self {
            rows: Vec::new(),
            filtered: None,
            search: SearchFilter::default(),
            pagination,
            infinite_scroll: true,
            fetch: FetchMore::default(),
            refresh: Refresh::default(),
            more_data: MoreDataStrategy::default(),
            total_count: None,
            has_more: false,
            loading: false,
            empty_reported: None,
            bindings: Vec::new(),
            live_bindings: HashSet::new(),
            removed_bindings: Vec::new(),
            next_binding: 0,
            pending: VecDeque::new(),
            dispatching: false,
            page_handler: None,
            refresh_handler: None,
        }
    }

    /// Creates a coordinator from crate configuration.
    #[must_use]
    pub fn from_config(config: &crate::Config) -> Self {
        let mut list = Self::new(Pagination::new(config.start_page, config.page_size));
        list.infinite_scroll = config.infinite_scroll;
        list.more_data = config.more_data;
        list
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Registers a view binding; it receives every subsequent change.
    pub fn subscribe<B>(&mut self, binding: B) -> BindingId
    where
        B: ViewBinding<T> + 'static,
    {
        let id = BindingId::new(self.next_binding);
        self.next_binding += 1;
        self.bindings.push((id, Box::new(binding)));
        self.live_bindings.insert(id);
        tracing::debug!(binding_id = id.0, "view binding subscribed");
        id
    }

    /// Removes a binding. Returns `false` if `id` was not registered.
    ///
    /// During a dispatch the bindings are detached from the coordinator, so the
    /// removal is recorded and applied once the current change is delivered.
    pub fn unsubscribe(&mut self, id: BindingId) -> bool {
        if !self.live_bindings.remove(&id) {
            return false;
        }
        match self.bindings.iter().position(|(b, _)| *b == id) {
            Some(pos) => {
                self.bindings.remove(pos);
            }
            None => self.removed_bindings.push(id),
        }
        tracing::debug!(binding_id = id.0, "view binding unsubscribed");
        true
    }

    /// Installs the infinite-scroll page handler and enables fetch-more.
    pub fn set_page_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Self, u32) + 'static,
    {
        self.page_handler = Some(Box::new(handler));
        self.pagination.set_enabled(self.infinite_scroll);
    }

    /// Removes the page handler and disables fetch-more.
    pub fn clear_page_handler(&mut self) {
        self.page_handler = None;
        self.pagination.set_enabled(false);
        self.has_more = false;
    }

    /// Allows or forbids infinite scroll without touching the page handler.
    pub fn set_infinite_scroll(&mut self, enabled: bool) {
        self.infinite_scroll = enabled;
        self.pagination
            .set_enabled(enabled && self.page_handler.is_some());
        if !enabled {
            self.has_more = false;
        }
    }

    /// Installs the pull-to-refresh handler.
    pub fn set_refresh_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Self) + 'static,
    {
        self.refresh_handler = Some(Box::new(handler));
    }

    /// Installs the search filter function.
    ///
    /// Takes effect on the next query change or mutation.
    pub fn set_filter(&mut self, filter: FilterFn<T>) {
        self.search.set_filter(filter);
    }

    /// Selects how "more pages exist" is decided.
    pub fn set_more_data_strategy(&mut self, strategy: MoreDataStrategy) {
        self.more_data = strategy;
        self.reopen_if_more();
    }

    /// Declares the total number of rows the source holds.
    ///
    /// Used by [`MoreDataStrategy::DeclaredTotal`]; `None` falls back to the
    /// full-page heuristic. Raising the total above the row count returns a
    /// `Completed` fetch status to `Idle`.
    pub fn set_total_count(&mut self, total: Option<usize>) {
        self.total_count = total;
        if self.more_data == MoreDataStrategy::DeclaredTotal {
            if let Some(total) = total {
                self.has_more = self.pagination.is_enabled() && self.rows.len() < total;
            }
        }
        self.reopen_if_more();
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// The authoritative row collection.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// The rows as rendered: the filtered view, or all rows without a search.
    #[must_use]
    pub fn visible(&self) -> &[T] {
        self.filtered.as_deref().unwrap_or(&self.rows)
    }

    /// Number of rendered rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.visible().len()
    }

    /// Whether no row is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Rendered row at `index`.
    #[must_use]
    pub fn object_at(&self, index: usize) -> Option<&T> {
        self.visible().get(index)
    }

    /// The current search query; empty when no search is active.
    #[must_use]
    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    /// Whether a non-empty query is applied.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.search.is_active()
    }

    /// The page counter.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// State of the fetch-more gate.
    #[must_use]
    pub const fn fetch_status(&self) -> FetchStatus {
        self.fetch.status()
    }

    /// Whether the next near-end signal may request another page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a pull-to-refresh is waiting for fresh data.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.refresh.is_active()
    }

    /// Whether the full-list loading indicator is shown.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Replaces every row.
    ///
    /// Cancels any in-flight fetch (a late `append_data` still applies),
    /// recomputes "has more" from the batch size and re-runs an active search.
    /// Emits [`ListChange::DataReplaced`] with the rendered row count.
    pub fn set_data(&mut self, rows: Vec<T>) {
        let _span = tracing::debug_span!("set_data", count = rows.len()).entered();

        let batch = rows.len();
        self.rows = rows;
        self.update_has_more(batch);
        let was_fetching = self.fetch.reset();
        self.refilter();

        let count = self.count();
        tracing::debug!(visible = count, has_more = self.has_more, "rows replaced");
        self.publish(ListChange::DataReplaced { count }, was_fetching);
    }

    /// Sets the rendered rows without touching the row collection.
    ///
    /// The override lasts until the next mutation or query change re-derives
    /// the view from the rows.
    pub fn set_visible(&mut self, rows: Vec<T>) {
        let _span = tracing::debug_span!("set_visible", count = rows.len()).entered();

        let batch = rows.len();
        self.filtered = Some(rows);
        self.update_has_more(batch);
        let was_fetching = self.fetch.reset();

        self.publish(ListChange::DataReplaced { count: batch }, was_fetching);
    }

    /// Appends rows to the end.
    ///
    /// This is how a requested page is delivered: it settles an in-flight
    /// fetch and recomputes "has more" from the batch size. Without a search, emits
    /// [`ListChange::DataAppended`] so the view can insert rows; with a
    /// search, re-filters and emits [`ListChange::DataReplaced`].
    pub fn append_data(&mut self, rows: Vec<T>) {
        let _span = tracing::debug_span!("append_data", count = rows.len()).entered();

        let start = self.rows.len();
        let count = rows.len();
        self.rows.extend(rows);
        self.update_has_more(count);
        let was_fetching = self.fetch.settle(self.exhausted());
        self.inserted(start, count, was_fetching);
    }

    /// Inserts rows at the top, keeping their relative order.
    ///
    /// Same notification rules as [`append_data`](Self::append_data), with a
    /// start index of 0. Prepended rows are not a page: an in-flight fetch
    /// stays in flight and "has more" is left as it is.
    pub fn prepend_data(&mut self, rows: Vec<T>) {
        let _span = tracing::debug_span!("prepend_data", count = rows.len()).entered();

        let count = rows.len();
        self.rows.splice(0..0, rows);
        self.inserted(0, count, false);
    }

    /// Replaces the rendered row at `index`.
    ///
    /// `index` is checked against the rendered row count. While a search is
    /// active the matching row of the collection is replaced and the view is
    /// re-filtered, since the new value may no longer match the query.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index` does not address a
    /// rendered row. Nothing is modified in that case.
    pub fn update_data(&mut self, item: T, index: usize) -> Result<()> {
        let _span = tracing::debug_span!("update_data", index = index).entered();
        self.check_index(index)?;

        let change = match self.filtered.as_mut() {
            None => {
                self.rows[index] = item;
                ListChange::ItemUpdated { index }
            }
            Some(view) => match raw_position(view, index, &self.rows) {
                Some(raw) => {
                    self.rows[raw] = item;
                    self.refilter();
                    ListChange::DataReplaced { count: self.count() }
                }
                None => {
                    view[index] = item;
                    ListChange::ItemUpdated { index }
                }
            },
        };

        tracing::debug!(change = ?change, "row updated");
        self.publish(change, false);
        Ok(())
    }

    /// Removes the rendered row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index` does not address a
    /// rendered row. Nothing is modified in that case.
    pub fn delete_data(&mut self, index: usize) -> Result<T> {
        let _span = tracing::debug_span!("delete_data", index = index).entered();
        self.check_index(index)?;

        let (removed, change) = match self.filtered.as_mut() {
            None => (self.rows.remove(index), ListChange::ItemRemoved { index }),
            Some(view) => match raw_position(view, index, &self.rows) {
                Some(raw) => {
                    let removed = self.rows.remove(raw);
                    self.refilter();
                    (removed, ListChange::DataReplaced { count: self.count() })
                }
                None => (view.remove(index), ListChange::ItemRemoved { index }),
            },
        };

        tracing::debug!(change = ?change, remaining = self.count(), "row deleted");
        self.publish(change, false);
        Ok(removed)
    }

    /// Removes every row and rewinds pagination.
    ///
    /// `reset_empty_state` is forwarded to the view; when false the empty
    /// state indicator is left as it is.
    pub fn clear_data(&mut self, reset_empty_state: bool) {
        let _span = tracing::debug_span!("clear_data", reset_empty_state = reset_empty_state).entered();

        self.rows.clear();
        self.pagination.reset();
        self.has_more = false;
        let was_fetching = self.fetch.reset();
        self.refilter();

        tracing::debug!("rows cleared");
        self.publish(ListChange::DataCleared { reset_empty_state }, was_fetching);
    }

    /// Changes the search query and re-derives the filtered view.
    ///
    /// An empty query restores the full row collection. Always emits
    /// [`ListChange::DataReplaced`]. Not debounced.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let _span = tracing::debug_span!("set_search_query", query_len = query.len()).entered();

        self.search.set_query(query);
        self.refilter();

        let count = self.count();
        tracing::trace!(query = %self.search.query(), visible = count, "search query updated");
        self.publish(ListChange::DataReplaced { count }, false);
    }

    /// Rewinds pagination to the start page.
    pub fn reset_pagination(&mut self) {
        self.pagination.reset();
        self.has_more = false;
    }

    // ---------------------------------------------------------------------
    // View intents
    // ---------------------------------------------------------------------

    /// Near-end signal: the view is about to render row `index`.
    ///
    /// Only the last rendered row triggers a page request, and only when more
    /// data is expected and no request is in flight. Returns whether the page
    /// handler was called.
    pub fn near_end(&mut self, index: usize) -> bool {
        let count = self.count();
        if count == 0 || index != count - 1 {
            return false;
        }
        if self.page_handler.is_none() || !self.pagination.is_enabled() {
            return false;
        }
        if !self.fetch.try_begin(self.has_more) {
            return false;
        }

        let page = self.pagination.advance();
        let _span = tracing::debug_span!("fetch_more", page = page).entered();
        tracing::debug!(visible = count, "requesting next page");

        self.emit(ListChange::FetchStarted { page });
        if let Some(mut handler) = self.page_handler.take() {
            handler(self, page);
            if self.page_handler.is_none() {
                self.page_handler = Some(handler);
            }
        }
        true
    }

    /// Reports that the in-flight page request failed.
    ///
    /// Returns the gate to `Idle` and steps the page counter back so the same
    /// page is requested again. Returns `false` if nothing was in flight.
    pub fn fetch_failed(&mut self) -> bool {
        if !self.fetch.reset() {
            tracing::trace!("fetch failure reported with no fetch in flight");
            return false;
        }
        self.pagination.retreat();
        tracing::debug!(page = self.pagination.current_page(), "page request failed");
        self.emit(ListChange::FetchSettled);
        true
    }

    /// Pull-to-refresh signal.
    ///
    /// Stops any fetch-more and rewinds pagination, then invokes the refresh
    /// handler. The refresh ends with the next `DataReplaced` or
    /// `DataCleared`. Returns `false` if no refresh handler is installed, in
    /// which case no refresh is started.
    pub fn pull_to_refresh(&mut self) -> bool {
        let _span = tracing::debug_span!("pull_to_refresh").entered();

        if self.fetch.reset() {
            self.emit(ListChange::FetchSettled);
        }
        self.pagination.reset();
        self.has_more = false;

        let Some(mut handler) = self.refresh_handler.take() else {
            tracing::debug!("no refresh handler installed");
            return false;
        };
        if self.refresh.begin() {
            self.emit(ListChange::RefreshStarted);
        }

        handler(self);
        if self.refresh_handler.is_none() {
            self.refresh_handler = Some(handler);
        }
        true
    }

    /// Shows the full-list loading indicator until data next settles.
    pub fn show_loading(&mut self) {
        if !std::mem::replace(&mut self.loading, true) {
            self.emit(ListChange::Loading { active: true });
        }
    }

    /// Hides the full-list loading indicator.
    pub fn hide_loading(&mut self) {
        if std::mem::replace(&mut self.loading, false) {
            self.emit(ListChange::Loading { active: false });
        }
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.count();
        if index >= len {
            tracing::debug!(index = index, len = len, "index out of range");
            return Err(ListError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn refilter(&mut self) {
        self.filtered = self.search.apply(&self.rows);
    }

    fn update_has_more(&mut self, batch: usize) {
        self.has_more = match (self.more_data, self.total_count) {
            (MoreDataStrategy::DeclaredTotal, Some(total)) => {
                self.pagination.is_enabled() && self.rows.len() < total
            }
            _ => self.pagination.should_fetch_more(batch),
        };
    }

    fn exhausted(&self) -> bool {
        self.more_data == MoreDataStrategy::DeclaredTotal
            && self.total_count.is_some_and(|total| self.rows.len() >= total)
    }

    fn reopen_if_more(&mut self) {
        if self.fetch.status() == FetchStatus::Completed && !self.exhausted() {
            self.fetch.reset();
            tracing::debug!(has_more = self.has_more, "fetch-more reopened");
        }
    }

    fn inserted(&mut self, start: usize, count: usize, was_fetching: bool) {
        let change = if self.search.is_active() || self.filtered.is_some() {
            self.refilter();
            ListChange::DataReplaced { count: self.count() }
        } else {
            ListChange::DataAppended { start, count }
        };

        tracing::debug!(
            total = self.rows.len(),
            has_more = self.has_more,
            change = ?change,
            "rows inserted"
        );
        self.publish(change, was_fetching);
    }

    /// Emits a data change followed by the indicator changes it implies.
    fn publish(&mut self, change: ListChange, was_fetching: bool) {
        let reload = change.is_reload();
        let reports_empty = !matches!(change, ListChange::DataCleared { reset_empty_state: false });
        let settles = !matches!(change, ListChange::ItemUpdated { .. } | ListChange::ItemRemoved { .. });

        self.emit(change);

        if was_fetching {
            self.emit(ListChange::FetchSettled);
        }
        if settles {
            self.hide_loading();
        }
        if reports_empty {
            let is_empty = self.is_empty();
            if self.empty_reported != Some(is_empty) {
                self.empty_reported = Some(is_empty);
                self.emit(ListChange::EmptyState { is_empty });
            }
        }
        if reload && self.refresh.finish() {
            tracing::debug!("refresh settled");
            self.emit(ListChange::RefreshEnded);
        }
    }

    fn emit(&mut self, change: ListChange) {
        self.pending.push_back(change);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(change) = self.pending.pop_front() {
            let mut bindings = std::mem::take(&mut self.bindings);
            for (id, binding) in &mut bindings {
                if self.removed_bindings.contains(id) {
                    continue;
                }
                binding.on_change(&change, self);
            }
            let added = std::mem::replace(&mut self.bindings, bindings);
            self.bindings.extend(added);
            if !self.removed_bindings.is_empty() {
                let removed = std::mem::take(&mut self.removed_bindings);
                self.bindings.retain(|(id, _)| !removed.contains(id));
            }
        }
        self.dispatching = false;
    }
}

/// Maps a filtered-view index to the matching position in `rows`.
///
/// The n-th occurrence of a value in the view maps to the n-th occurrence of
/// an equal value in the rows, which keeps duplicates apart. Returns `None`
/// when the filter produced a value that is not in the rows.
pub(crate) fn raw_position<T: PartialEq>(view: &[T], index: usize, rows: &[T]) -> Option<usize> {
    let target = view.get(index)?;
    let occurrence = view[..index].iter().filter(|item| *item == target).count();
    rows.iter()
        .enumerate()
        .filter(|(_, item)| *item == target)
        .nth(occurrence)
        .map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::binding::ChangeLog;
    use crate::list::search::prefix_filter;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn paged(start: u32, size: usize) -> (ListCoordinator<u32>, ChangeLog, Rc<RefCell<Vec<u32>>>) {
        let log = ChangeLog::default();
        let pages = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&pages);

        let mut list = ListCoordinator::new(Pagination::new(start, size));
        list.subscribe(log.clone());
        list.set_page_handler(move |_list: &mut ListCoordinator<u32>, page| seen.borrow_mut().push(page));
        (list, log, pages)
    }

    #[test]
    fn set_data_replaces_and_reports_empty_state() {
        let (mut list, log, _) = paged(0, 20);

        list.set_data(vec![1, 2, 3]);
        list.set_data(vec![]);

        assert_eq!(
            log.take(),
            vec![
                ListChange::DataReplaced { count: 3 },
                ListChange::EmptyState { is_empty: false },
                ListChange::DataReplaced { count: 0 },
                ListChange::EmptyState { is_empty: true },
            ]
        );
    }

    #[test]
    fn append_without_search_is_incremental() {
        let (mut list, log, _) = paged(0, 20);
        list.set_data(vec![1, 2]);
        log.take();

        list.append_data(vec![3, 4, 5]);
        assert_eq!(log.take(), vec![ListChange::DataAppended { start: 2, count: 3 }]);
        assert_eq!(list.rows(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn prepend_keeps_batch_order() {
        let (mut list, log, _) = paged(0, 20);
        list.set_data(vec![3]);
        log.take();

        list.prepend_data(vec![1, 2]);
        assert_eq!(list.rows(), &[1, 2, 3]);
        assert_eq!(log.take(), vec![ListChange::DataAppended { start: 0, count: 2 }]);
    }

    #[test]
    fn update_and_delete_validate_against_visible_rows() {
        let (mut list, log, _) = paged(0, 20);
        list.set_data(vec![10, 20, 30]);
        log.take();

        list.update_data(21, 1).unwrap();
        assert_eq!(list.delete_data(0).unwrap(), 10);
        assert_eq!(list.rows(), &[21, 30]);
        assert_eq!(
            log.take(),
            vec![ListChange::ItemUpdated { index: 1 }, ListChange::ItemRemoved { index: 0 }]
        );

        assert!(matches!(list.update_data(1, 2), Err(ListError::IndexOutOfRange { index: 2, len: 2 })));
        assert!(matches!(list.delete_data(9), Err(ListError::IndexOutOfRange { index: 9, len: 2 })));
        assert_eq!(list.rows(), &[21, 30]);
        assert!(log.take().is_empty());
    }

    #[test]
    fn deleting_the_last_row_reports_empty() {
        let (mut list, log, _) = paged(0, 20);
        list.set_data(vec![7]);
        log.take();

        list.delete_data(0).unwrap();
        assert_eq!(
            log.take(),
            vec![ListChange::ItemRemoved { index: 0 }, ListChange::EmptyState { is_empty: true }]
        );
    }

    #[test]
    fn updates_under_search_hit_the_matching_row_and_refilter() {
        let mut list: ListCoordinator<String> = ListCoordinator::default();
        list.set_filter(prefix_filter(|s: &String| s.clone()));
        list.set_data(vec!["ant".into(), "bee".into(), "ape".into()]);
        list.set_search_query("a");
        assert_eq!(list.visible(), &["ant".to_string(), "ape".to_string()]);

        list.update_data("bat".into(), 1).unwrap();
        assert_eq!(list.rows(), &["ant".to_string(), "bee".to_string(), "bat".to_string()]);
        assert_eq!(list.visible(), &["ant".to_string()]);

        list.delete_data(0).unwrap();
        assert_eq!(list.rows(), &["bee".to_string(), "bat".to_string()]);
        assert!(list.is_empty());
    }

    #[test]
    fn raw_position_keeps_duplicates_apart() {
        let rows = [5, 1, 5, 2, 5];
        let view = [5, 5, 5];
        assert_eq!(raw_position(&view, 0, &rows), Some(0));
        assert_eq!(raw_position(&view, 1, &rows), Some(2));
        assert_eq!(raw_position(&view, 2, &rows), Some(4));
        assert_eq!(raw_position(&[9], 0, &rows), None);
    }

    #[test]
    fn near_end_only_fires_on_the_last_row() {
        let (mut list, log, pages) = paged(1, 3);
        list.append_data(vec![1, 2, 3]);
        log.take();

        assert!(!list.near_end(1));
        assert!(list.near_end(2));
        assert!(!list.near_end(2));
        assert_eq!(*pages.borrow(), vec![2]);
        assert_eq!(list.fetch_status(), FetchStatus::Fetching);
        assert_eq!(log.take(), vec![ListChange::FetchStarted { page: 2 }]);

        list.append_data(vec![4]);
        assert_eq!(list.fetch_status(), FetchStatus::Idle);
        assert!(!list.has_more());
        assert_eq!(
            log.take(),
            vec![ListChange::DataAppended { start: 3, count: 1 }, ListChange::FetchSettled]
        );
        assert!(!list.near_end(3));
    }

    #[test]
    fn set_data_cancels_an_in_flight_fetch() {
        let (mut list, _log, _) = paged(0, 2);
        list.set_data(vec![1, 2]);
        assert!(list.near_end(1));

        list.set_data(vec![9]);
        assert_eq!(list.fetch_status(), FetchStatus::Idle);

        list.append_data(vec![3, 4]);
        assert_eq!(list.rows(), &[9, 3, 4]);
        assert_eq!(list.fetch_status(), FetchStatus::Idle);
    }

    #[test]
    fn fetch_failed_rewinds_the_page() {
        let (mut list, log, pages) = paged(0, 2);
        list.set_data(vec![1, 2]);
        assert!(list.near_end(1));
        log.take();

        assert!(list.fetch_failed());
        assert_eq!(list.pagination().current_page(), 0);
        assert_eq!(log.take(), vec![ListChange::FetchSettled]);
        assert!(!list.fetch_failed());

        assert!(list.near_end(1));
        assert_eq!(*pages.borrow(), vec![1, 1]);
    }

    #[test]
    fn declared_total_completes_the_fetch() {
        let (mut list, _log, _) = paged(0, 2);
        list.set_more_data_strategy(MoreDataStrategy::DeclaredTotal);
        list.set_total_count(Some(3));

        list.set_data(vec![1]);
        assert!(list.has_more());
        assert!(list.near_end(0));

        list.append_data(vec![2, 3]);
        assert!(!list.has_more());
        assert_eq!(list.fetch_status(), FetchStatus::Completed);
        assert!(!list.near_end(2));

        list.clear_data(true);
        assert_eq!(list.fetch_status(), FetchStatus::Idle);
    }

    #[test]
    fn infinite_scroll_can_be_switched_off() {
        let (mut list, _log, pages) = paged(0, 1);
        list.set_infinite_scroll(false);
        list.set_data(vec![1]);
        assert!(!list.has_more());
        assert!(!list.near_end(0));

        list.set_infinite_scroll(true);
        list.append_data(vec![2]);
        assert!(list.near_end(1));
        assert_eq!(*pages.borrow(), vec![1]);
    }

    #[test]
    fn clear_without_empty_state_leaves_indicator_alone() {
        let (mut list, log, _) = paged(0, 20);
        list.set_data(vec![1]);
        log.take();

        list.clear_data(false);
        assert_eq!(log.take(), vec![ListChange::DataCleared { reset_empty_state: false }]);

        list.clear_data(true);
        assert_eq!(
            log.take(),
            vec![
                ListChange::DataCleared { reset_empty_state: true },
                ListChange::EmptyState { is_empty: true },
            ]
        );
    }

    #[test]
    fn loading_indicator_hides_when_data_settles() {
        let (mut list, log, _) = paged(0, 20);
        list.show_loading();
        list.show_loading();
        assert!(list.is_loading());

        list.set_data(vec![1]);
        assert!(!list.is_loading());
        assert_eq!(
            log.take(),
            vec![
                ListChange::Loading { active: true },
                ListChange::DataReplaced { count: 1 },
                ListChange::Loading { active: false },
                ListChange::EmptyState { is_empty: false },
            ]
        );
    }

    #[test]
    fn set_visible_overrides_until_next_mutation() {
        let (mut list, _log, _) = paged(0, 20);
        list.set_data(vec![1, 2, 3]);

        list.set_visible(vec![3]);
        assert_eq!(list.rows(), &[1, 2, 3]);
        assert_eq!(list.visible(), &[3]);

        list.append_data(vec![4]);
        assert_eq!(list.visible(), &[1, 2, 3, 4]);
    }

    struct Reloader;

    impl ViewBinding<u32> for Reloader {
        fn on_change(&mut self, change: &ListChange, list: &mut ListCoordinator<u32>) {
            if *change == (ListChange::DataAppended { start: 0, count: 1 }) {
                list.set_data(vec![100, 200]);
            }
        }
    }

    #[test]
    fn bindings_may_mutate_during_dispatch() {
        let log = ChangeLog::default();
        let mut list: ListCoordinator<u32> = ListCoordinator::default();
        list.subscribe(Reloader);
        list.subscribe(log.clone());

        list.append_data(vec![1]);

        assert_eq!(list.rows(), &[100, 200]);
        assert_eq!(
            log.take(),
            vec![
                ListChange::DataAppended { start: 0, count: 1 },
                ListChange::DataReplaced { count: 2 },
                ListChange::EmptyState { is_empty: false },
            ]
        );
    }

    #[test]
    fn unsubscribed_bindings_stop_receiving() {
        let log = ChangeLog::default();
        let mut list: ListCoordinator<u32> = ListCoordinator::default();
        let id = list.subscribe(log.clone());

        list.set_data(vec![1]);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.set_data(vec![2]);

        assert_eq!(log.changes().len(), 2);
    }

    #[test]
    fn prepend_leaves_an_in_flight_fetch_pending() {
        let (mut list, log, pages) = paged(0, 2);
        list.set_data(vec![1, 2]);
        assert!(list.near_end(1));
        log.take();

        list.prepend_data(vec![10, 11]);
        assert_eq!(list.fetch_status(), FetchStatus::Fetching);
        assert!(list.has_more());
        assert_eq!(log.take(), vec![ListChange::DataAppended { start: 0, count: 2 }]);
        assert!(!list.near_end(3));

        list.append_data(vec![3]);
        assert_eq!(list.fetch_status(), FetchStatus::Idle);
        assert_eq!(
            log.take(),
            vec![ListChange::DataAppended { start: 4, count: 1 }, ListChange::FetchSettled]
        );
        assert_eq!(*pages.borrow(), vec![1]);
    }

    #[test]
    fn near_end_ignores_indices_past_the_end() {
        let (mut list, _log, pages) = paged(0, 2);
        assert!(!list.near_end(usize::MAX));

        list.set_data(vec![1, 2]);
        assert!(!list.near_end(usize::MAX));
        assert!(!list.near_end(2));
        assert!(pages.borrow().is_empty());
    }

    #[test]
    fn raising_the_declared_total_reopens_fetching() {
        let (mut list, _log, pages) = paged(0, 2);
        list.set_more_data_strategy(MoreDataStrategy::DeclaredTotal);
        list.set_total_count(Some(3));
        list.set_data(vec![1, 2]);
        assert!(list.near_end(1));
        list.append_data(vec![3]);
        assert_eq!(list.fetch_status(), FetchStatus::Completed);

        list.set_total_count(Some(3));
        assert_eq!(list.fetch_status(), FetchStatus::Completed);

        list.set_total_count(Some(5));
        assert_eq!(list.fetch_status(), FetchStatus::Idle);
        assert!(list.has_more());
        assert!(list.near_end(2));
        assert_eq!(*pages.borrow(), vec![1, 2]);
    }

    struct Unsubscriber {
        targets: Rc<RefCell<Vec<BindingId>>>,
        results: Rc<RefCell<Vec<bool>>>,
    }

    impl ViewBinding<u32> for Unsubscriber {
        fn on_change(&mut self, change: &ListChange, list: &mut ListCoordinator<u32>) {
            if !matches!(change, ListChange::DataReplaced { .. }) {
                return;
            }
            let targets = self.targets.borrow().clone();
            for id in targets {
                self.results.borrow_mut().push(list.unsubscribe(id));
            }
        }
    }

    #[test]
    fn unsubscribe_during_dispatch_only_reports_live_bindings() {
        let log = ChangeLog::default();
        let targets: Rc<RefCell<Vec<BindingId>>> = Rc::default();
        let results: Rc<RefCell<Vec<bool>>> = Rc::default();
        let mut list: ListCoordinator<u32> = ListCoordinator::default();

        let gone = list.subscribe(log.clone());
        let own = list.subscribe(Unsubscriber {
            targets: Rc::clone(&targets),
            results: Rc::clone(&results),
        });
        assert!(list.unsubscribe(gone));
        targets.borrow_mut().extend([gone, own, own]);

        list.set_data(vec![1]);
        assert_eq!(*results.borrow(), vec![false, true, false]);

        list.set_data(vec![2]);
        assert_eq!(results.borrow().len(), 3);
        assert!(log.changes().is_empty());
    }
}
