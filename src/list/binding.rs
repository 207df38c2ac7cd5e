//! View binding interface.
//!
//! A [`ViewBinding`] is the rendering side of a list: it turns
//! [`ListChange`] notifications into widget updates. Bindings are owned by
//! the coordinator they subscribe to, so no back-reference from the view to
//! the coordinator is needed.
//!
//! Every render method has a no-op default. Simple bindings override the
//! render methods they care about; bindings that need to react by mutating
//! the list override [`ViewBinding::on_change`], which receives the
//! coordinator itself.

use super::changes::ListChange;
use super::state::ListCoordinator;
use std::cell::RefCell;
use std::rc::Rc;

/// Rendering side of a list coordinator.
#[allow(unused_variables)]
pub trait ViewBinding<T> {
    /// Reload every row; the view now holds `count` rows.
    fn render_replaced(&mut self, count: usize) {}

    /// Insert `count` rows at `start`.
    fn render_appended(&mut self, start: usize, count: usize) {}

    /// Reload the row at `index`.
    fn render_updated(&mut self, index: usize) {}

    /// Remove the row at `index`.
    fn render_removed(&mut self, index: usize) {}

    /// Remove every row.
    fn render_cleared(&mut self, reset_empty_state: bool) {}

    /// Show or hide the empty-state view.
    fn report_empty_state(&mut self, is_empty: bool) {}

    /// Show or hide the fetch-more footer indicator.
    fn render_fetching(&mut self, active: bool) {}

    /// Start or end the pull-to-refresh animation.
    fn render_refreshing(&mut self, active: bool) {}

    /// Show or hide the full-list loading indicator.
    fn render_loading(&mut self, active: bool) {}

    /// Receives every change together with the emitting coordinator.
    ///
    /// Mutations called on `list` from here are applied immediately; the
    /// changes they emit are queued and delivered after the current change
    /// has reached every binding.
    fn on_change(&mut self, change: &ListChange, list: &mut ListCoordinator<T>) {
        match *change {
            ListChange::DataReplaced { count } => self.render_replaced(count),
            ListChange::DataAppended { start, count } => self.render_appended(start, count),
            ListChange::ItemUpdated { index } => self.render_updated(index),
            ListChange::ItemRemoved { index } => self.render_removed(index),
            ListChange::DataCleared { reset_empty_state } => self.render_cleared(reset_empty_state),
            ListChange::EmptyState { is_empty } => self.report_empty_state(is_empty),
            ListChange::FetchStarted { .. } => self.render_fetching(true),
            ListChange::FetchSettled => self.render_fetching(false),
            ListChange::RefreshStarted => self.render_refreshing(true),
            ListChange::RefreshEnded => self.render_refreshing(false),
            ListChange::Loading { active } => self.render_loading(active),
        }
    }
}

/// Binding that records every change it receives.
///
/// The log is shared, so a clone kept by the caller observes what the
/// coordinator-owned copy records.
///
/// # Example
///
/// ```
/// use listkeeper::list::{ChangeLog, ListChange, ListCoordinator};
///
/// let log = ChangeLog::default();
/// let mut list: ListCoordinator<u32> = ListCoordinator::default();
/// list.subscribe(log.clone());
///
/// list.set_data(vec![1, 2]);
/// assert_eq!(log.changes()[0], ListChange::DataReplaced { count: 2 });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Rc<RefCell<Vec<ListChange>>>,
}

impl ChangeLog {
    /// Snapshot of the recorded changes.
    #[must_use]
    pub fn changes(&self) -> Vec<ListChange> {
        self.changes.borrow().clone()
    }

    /// Removes and returns the recorded changes.
    pub fn take(&self) -> Vec<ListChange> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }
}

impl<T> ViewBinding<T> for ChangeLog {
    fn on_change(&mut self, change: &ListChange, _list: &mut ListCoordinator<T>) {
        self.changes.borrow_mut().push(*change);
    }
}
