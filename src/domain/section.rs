//! Section model for grouped lists.
//!
//! A sectioned list replaces the flat row collection with an ordered sequence
//! of [`Section`]s. Titles act as unique keys: merging data for a title that
//! already exists extends that section instead of adding a duplicate.

use super::error::{ListError, Result};

/// A titled group of rows.
///
/// `title` may be `None` for an untitled section; `None` is itself a key, so a
/// list holds at most one untitled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<T> {
    pub title: Option<String>,
    pub rows: Vec<T>,
}

impl<T> Section<T> {
    /// Creates a section with a title.
    ///
    /// # Examples
    ///
    /// ```
    /// use listkeeper::domain::Section;
    ///
    /// let section = Section::titled("Fruit", vec!["apple", "pear"]);
    /// assert_eq!(section.title.as_deref(), Some("Fruit"));
    /// assert_eq!(section.rows.len(), 2);
    /// ```
    #[must_use]
    pub fn titled(title: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            title: Some(title.into()),
            rows,
        }
    }

    /// Creates a section without a title.
    #[must_use]
    pub const fn untitled(rows: Vec<T>) -> Self {
        Self { title: None, rows }
    }
}

/// Position of a row inside a sectioned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    #[must_use]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// Returns the position of the section keyed by `title`.
pub fn position_of_title<T>(sections: &[Section<T>], title: Option<&str>) -> Option<usize> {
    sections.iter().position(|s| s.title.as_deref() == title)
}

/// Like [`position_of_title`], failing with [`ListError::SectionNotFound`].
///
/// # Errors
///
/// Returns an error if no section carries `title`.
pub fn require_title<T>(sections: &[Section<T>], title: Option<&str>) -> Result<usize> {
    position_of_title(sections, title)
        .ok_or_else(|| ListError::SectionNotFound(title.map(String::from)))
}

/// Checks that `path` addresses an existing row.
///
/// The reported `len` is the row count of the addressed section, or the
/// section count when the section itself is missing.
///
/// # Errors
///
/// Returns [`ListError::IndexOutOfRange`] if either component is out of range.
pub fn check_path<T>(sections: &[Section<T>], path: IndexPath) -> Result<()> {
    let Some(section) = sections.get(path.section) else {
        return Err(ListError::IndexOutOfRange {
            index: path.section,
            len: sections.len(),
        });
    };
    if path.row >= section.rows.len() {
        return Err(ListError::IndexOutOfRange {
            index: path.row,
            len: section.rows.len(),
        });
    }
    Ok(())
}

/// Merges `incoming` into `sections` by title.
///
/// Rows for an existing title are appended to that section in order; sections
/// with unseen titles are appended to the end. Titles repeated inside
/// `incoming` collapse into the first occurrence.
pub fn merge_sections<T>(sections: &mut Vec<Section<T>>, incoming: Vec<Section<T>>) {
    for section in incoming {
        match position_of_title(sections, section.title.as_deref()) {
            Some(index) => sections[index].rows.extend(section.rows),
            None => sections.push(section),
        }
    }
}

/// Collapses duplicate titles in a freshly supplied section list.
pub fn dedup_titles<T>(incoming: Vec<Section<T>>) -> Vec<Section<T>> {
    let mut sections = Vec::with_capacity(incoming.len());
    merge_sections(&mut sections, incoming);
    sections
}
