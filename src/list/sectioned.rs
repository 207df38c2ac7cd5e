//! Coordinator for grouped lists.
//!
//! [`SectionedCoordinator`] is the sectioned counterpart of
//! [`ListCoordinator`](super::ListCoordinator): rows live in title-keyed
//! [`Section`]s and are addressed by [`IndexPath`]. Search runs over each
//! section's rows separately; sections the search leaves empty are hidden.
//!
//! Infinite scroll and pull-to-refresh are flat-list features and are not
//! offered here.
//!
//! Listeners receive `&mut SectionedCoordinator` and may mutate it while being
//! notified. As in the flat list, changes emitted during a dispatch are queued
//! behind the change being delivered.

use super::search::{FilterFn, SearchFilter};
use super::state::{raw_position, BindingId};
use crate::domain::error::Result;
use crate::domain::section::{
    check_path, dedup_titles, merge_sections, position_of_title, require_title, IndexPath, Section,
};
use std::collections::{HashSet, VecDeque};

/// Notification describing how a sectioned list changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionChange {
    /// Reload everything; the view now holds `sections` sections and `rows`
    /// rows in total.
    Reloaded { sections: usize, rows: usize },
    /// The row at the path was replaced in place.
    RowUpdated(IndexPath),
    /// The row at the path was removed.
    RowRemoved(IndexPath),
    /// The section at this index was removed.
    SectionRemoved(usize),
    /// Every section was removed.
    Cleared { reset_empty_state: bool },
    /// The empty-state indicator should be shown or hidden.
    EmptyState { is_empty: bool },
}

/// Listener receiving sectioned-list changes together with the coordinator.
pub type SectionListener<T> = Box<dyn FnMut(&SectionChange, &mut SectionedCoordinator<T>)>;

/// Owner of a grouped list's sections and search state.
pub struct SectionedCoordinator<T> {
    sections: Vec<Section<T>>,
    filtered: Option<Vec<Section<T>>>,
    search: SearchFilter<T>,
    listeners: Vec<(BindingId, SectionListener<T>)>,
    live_listeners: HashSet<BindingId>,
    removed_listeners: Vec<BindingId>,
    next_listener: u64,
    pending: VecDeque<SectionChange>,
    dispatching: bool,
    empty_reported: Option<bool>,
}

impl<T> Default for SectionedCoordinator<T> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            filtered: None,
            search: SearchFilter::default(),
            listeners: Vec::new(),
            live_listeners: HashSet::new(),
            removed_listeners: Vec::new(),
            next_listener: 0,
            pending: VecDeque::new(),
            dispatching: false,
            empty_reported: None,
        }
    }
}

impl<T> std::fmt::Debug for SectionedCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionedCoordinator")
            .field("sections", &self.sections.len())
            .field("filtered", &self.filtered.as_ref().map(Vec::len))
            .field("search", &self.search)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq> SectionedCoordinator<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a change listener; it receives every subsequent change.
    pub fn subscribe<F>(&mut self, listener: F) -> BindingId
    where
        F: FnMut(&SectionChange, &mut Self) + 'static,
    {
        let id = BindingId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        self.live_listeners.insert(id);
        tracing::debug!(listener_id = ?id, "section listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: BindingId) -> bool {
        if !self.live_listeners.remove(&id) {
            return false;
        }
        match self.listeners.iter().position(|(l, _)| *l == id) {
            Some(pos) => {
                self.listeners.remove(pos);
            }
            None => self.removed_listeners.push(id),
        }
        true
    }

    pub fn set_filter(&mut self, filter: FilterFn<T>) {
        self.search.set_filter(filter);
    }

    /// All sections, ignoring search.
    #[must_use]
    pub fn sections(&self) -> &[Section<T>] {
        &self.sections
    }

    /// Sections as rendered.
    #[must_use]
    pub fn visible(&self) -> &[Section<T>] {
        self.filtered.as_deref().unwrap_or(&self.sections)
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.visible().len()
    }

    /// Rendered row count of one section; 0 for a missing section.
    #[must_use]
    pub fn row_count(&self, section: usize) -> usize {
        self.visible().get(section).map_or(0, |s| s.rows.len())
    }

    /// Rendered row count across all sections.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.visible().iter().map(|s| s.rows.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }

    /// Title of the rendered section at `section`.
    #[must_use]
    pub fn title_at(&self, section: usize) -> Option<&str> {
        self.visible().get(section)?.title.as_deref()
    }

    #[must_use]
    pub fn object_at(&self, path: IndexPath) -> Option<&T> {
        self.visible().get(path.section)?.rows.get(path.row)
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    /// Replaces every section. Repeated titles are merged.
    pub fn set_data(&mut self, sections: Vec<Section<T>>) {
        let _span = tracing::debug_span!("set_sections", count = sections.len()).entered();
        self.sections = dedup_titles(sections);
        self.reload();
    }

    /// Merges sections by title; unseen titles are appended at the end.
    pub fn append_data(&mut self, sections: Vec<Section<T>>) {
        let _span = tracing::debug_span!("append_sections", count = sections.len()).entered();
        merge_sections(&mut self.sections, sections);
        self.reload();
    }

    /// Replaces the rows of the section titled `title`, creating it if absent.
    pub fn set_rows(&mut self, title: Option<&str>, rows: Vec<T>) {
        let _span = tracing::debug_span!("set_section_rows", title = ?title, count = rows.len()).entered();
        match position_of_title(&self.sections, title) {
            Some(index) => self.sections[index].rows = rows,
            None => self.sections.push(Section {
                title: title.map(String::from),
                rows,
            }),
        }
        self.reload();
    }

    /// Appends rows to the section titled `title`, creating it if absent.
    pub fn append_rows(&mut self, title: Option<&str>, rows: Vec<T>) {
        let _span = tracing::debug_span!("append_section_rows", title = ?title, count = rows.len()).entered();
        merge_sections(
            &mut self.sections,
            vec![Section {
                title: title.map(String::from),
                rows,
            }],
        );
        self.reload();
    }

    /// Replaces the rendered row at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`](crate::ListError::IndexOutOfRange)
    /// if `path` does not address a rendered row.
    pub fn update_data(&mut self, item: T, path: IndexPath) -> Result<()> {
        let _span = tracing::debug_span!("update_section_row", section = path.section, row = path.row).entered();
        check_path(self.visible(), path)?;

        if let Some(raw) = self.raw_path(path) {
            self.sections[raw.section].rows[raw.row] = item;
            if self.filtered.is_none() {
                self.emit(SectionChange::RowUpdated(path));
                return Ok(());
            }
        } else if let Some(view) = self.filtered.as_mut() {
            view[path.section].rows[path.row] = item;
            self.emit(SectionChange::RowUpdated(path));
            return Ok(());
        }
        self.reload();
        Ok(())
    }

    /// Removes the rendered row at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`](crate::ListError::IndexOutOfRange)
    /// if `path` does not address a rendered row.
    pub fn delete_data(&mut self, path: IndexPath) -> Result<T> {
        let _span = tracing::debug_span!("delete_section_row", section = path.section, row = path.row).entered();
        check_path(self.visible(), path)?;

        let raw = self.raw_path(path);
        let Some(view) = self.filtered.as_mut() else {
            let removed = self.sections[path.section].rows.remove(path.row);
            self.emit(SectionChange::RowRemoved(path));
            self.sync_empty_state();
            return Ok(removed);
        };
        let removed = match raw {
            Some(raw) => self.sections[raw.section].rows.remove(raw.row),
            None => {
                let removed = view[path.section].rows.remove(path.row);
                self.emit(SectionChange::RowRemoved(path));
                self.sync_empty_state();
                return Ok(removed);
            }
        };
        self.reload();
        Ok(removed)
    }

    /// Removes the section titled `title` together with its rows.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::SectionNotFound`](crate::ListError::SectionNotFound)
    /// if no section carries `title`.
    pub fn delete_section(&mut self, title: Option<&str>) -> Result<Section<T>> {
        let _span = tracing::debug_span!("delete_section", title = ?title).entered();
        let index = require_title(&self.sections, title)?;
        let removed = self.sections.remove(index);

        if self.filtered.is_none() {
            tracing::debug!(index = index, "section removed");
            self.emit(SectionChange::SectionRemoved(index));
            self.sync_empty_state();
        } else {
            self.reload();
        }
        Ok(removed)
    }

    /// Removes every row of the section titled `title`, keeping the section.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::SectionNotFound`](crate::ListError::SectionNotFound)
    /// if no section carries `title`.
    pub fn delete_rows(&mut self, title: Option<&str>) -> Result<Vec<T>> {
        let _span = tracing::debug_span!("delete_section_rows", title = ?title).entered();
        let index = require_title(&self.sections, title)?;
        let removed = std::mem::take(&mut self.sections[index].rows);
        self.reload();
        Ok(removed)
    }

    /// Removes every section.
    pub fn clear_data(&mut self, reset_empty_state: bool) {
        let _span = tracing::debug_span!("clear_sections", reset_empty_state = reset_empty_state).entered();
        self.sections.clear();
        self.filtered = None;
        self.emit(SectionChange::Cleared { reset_empty_state });
        if reset_empty_state {
            self.sync_empty_state();
        }
    }

    /// Changes the search query and re-filters every section.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search.set_query(query);
        tracing::trace!(query = %self.search.query(), "section search query updated");
        self.reload();
    }

    fn refilter(&mut self) {
        if !self.search.is_active() || !self.search.has_filter() {
            self.filtered = None;
            return;
        }
        let search = &self.search;
        self.filtered = Some(
            self.sections
                .iter()
                .filter_map(|section| {
                    let rows = search.apply(&section.rows)?;
                    (!rows.is_empty()).then(|| Section {
                        title: section.title.clone(),
                        rows,
                    })
                })
                .collect(),
        );
    }

    /// Maps a rendered path to the matching path in the full sections.
    fn raw_path(&self, path: IndexPath) -> Option<IndexPath> {
        let Some(view) = self.filtered.as_ref() else {
            return Some(path);
        };
        let section = view.get(path.section)?;
        let raw_section = position_of_title(&self.sections, section.title.as_deref())?;
        let raw_row = raw_position(&section.rows, path.row, &self.sections[raw_section].rows)?;
        Some(IndexPath::new(raw_section, raw_row))
    }

    fn reload(&mut self) {
        self.refilter();
        let change = SectionChange::Reloaded {
            sections: self.section_count(),
            rows: self.total_rows(),
        };
        tracing::debug!(change = ?change, "sections reloaded");
        self.emit(change);
        self.sync_empty_state();
    }

    fn sync_empty_state(&mut self) {
        let is_empty = self.is_empty();
        if self.empty_reported != Some(is_empty) {
            self.empty_reported = Some(is_empty);
            self.emit(SectionChange::EmptyState { is_empty });
        }
    }

    fn emit(&mut self, change: SectionChange) {
        self.pending.push_back(change);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(change) = self.pending.pop_front() {
            let mut listeners = std::mem::take(&mut self.listeners);
            for (id, listener) in &mut listeners {
                if self.removed_listeners.contains(id) {
                    continue;
                }
                listener(&change, self);
            }
            let added = std::mem::replace(&mut self.listeners, listeners);
            self.listeners.extend(added);
            if !self.removed_listeners.is_empty() {
                let removed = std::mem::take(&mut self.removed_listeners);
                self.listeners.retain(|(id, _)| !removed.contains(id));
            }
        }
        self.dispatching = false;
    }
}
