//! Search query state and filter functions.
//!
//! The coordinator holds one [`SearchFilter`]: the current query plus an
//! optional caller-supplied filter function. An empty query means the full
//! row collection is shown and the filter function is never invoked.
//!
//! [`fuzzy_filter`] builds a ready-made filter that keeps rows whose search
//! key fuzzy-matches every whitespace-separated query token.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Filter function: `(query, rows) -> matching rows`.
///
/// Expected to be pure and synchronous. It is only called with a non-empty
/// query.
pub type FilterFn<T> = Box<dyn Fn(&str, &[T]) -> Vec<T>>;

/// Current search query and the filter that applies it.
pub struct SearchFilter<T> {
    query: String,
    filter: Option<FilterFn<T>>,
}

impl<T> Default for SearchFilter<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            filter: None,
        }
    }
}

impl<T> std::fmt::Debug for SearchFilter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchFilter")
            .field("query", &self.query)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

impl<T: Clone> SearchFilter<T> {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a non-empty query is stored.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_filter(&mut self, filter: FilterFn<T>) {
        self.filter = Some(filter);
    }

    #[must_use]
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Runs the filter over `rows`.
    ///
    /// Returns `None` when the filtered view should be the row collection
    /// itself: the query is empty, or no filter function is installed.
    #[must_use]
    pub fn apply(&self, rows: &[T]) -> Option<Vec<T>> {
        if self.query.is_empty() {
            return None;
        }

        let Some(filter) = self.filter.as_ref() else {
            tracing::debug!(query = %self.query, "search query set without a filter function, showing all rows");
            return None;
        };

        let _span = tracing::debug_span!("apply_search_filter",
            total_rows = rows.len(),
            query_len = self.query.len()
        ).entered();

        let filtered = filter(&self.query, rows);

        tracing::debug!(filtered_count = filtered.len(), "search filter applied");
        Some(filtered)
    }
}

/// Builds a fuzzy filter over a per-row search key.
///
/// The query is split on whitespace and lowercased; a row is kept when every
/// token fuzzy-matches the lowercased key. Row order is preserved.
///
/// # Examples
///
/// ```
/// use listkeeper::list::search::fuzzy_filter;
///
/// let filter = fuzzy_filter(|name: &String| name.clone());
/// let rows = vec!["release-notes".to_string(), "bubbles".to_string()];
/// assert_eq!(filter("rls nts", rows.as_slice()), vec!["release-notes".to_string()]);
/// ```
pub fn fuzzy_filter<T, K>(key: K) -> FilterFn<T>
where
    T: Clone + 'static,
    K: Fn(&T) -> String + 'static,
{
    Box::new(move |query: &str, rows: &[T]| {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return rows.to_vec();
        }

        let matcher = SkimMatcherV2::default();
        rows.iter()
            .filter(|row| {
                let haystack = key(*row).to_lowercase();
                tokens
                    .iter()
                    .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
            })
            .cloned()
            .collect()
    })
}

/// Builds a case-insensitive prefix filter over a per-row search key.
pub fn prefix_filter<T, K>(key: K) -> FilterFn<T>
where
    T: Clone + 'static,
    K: Fn(&T) -> String + 'static,
{
    Box::new(move |query: &str, rows: &[T]| {
        let query = query.to_lowercase();
        rows.iter()
            .filter(|row| key(*row).to_lowercase().starts_with(&query))
            .cloned()
            .collect()
    })
}
