//! Page bookkeeping for infinite scrolling.

/// Page counter handed to the page handler.
///
/// `current_page` never drops below `start_page`. The counter is advanced
/// before each page request and rewound on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    start_page: u32,
    current_page: u32,
    page_size: usize,
    enabled: bool,
}

/// Default first page number.
pub const DEFAULT_START_PAGE: u32 = 0;

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_START_PAGE, DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Creates a counter positioned on `start_page`.
    ///
    /// Infinite scroll starts disabled; it is enabled when a page handler is
    /// installed on the coordinator.
    ///
    /// # Examples
    ///
    /// ```
    /// use listkeeper::list::Pagination;
    ///
    /// let mut pagination = Pagination::new(1, 20);
    /// assert_eq!(pagination.advance(), 2);
    /// pagination.reset();
    /// assert_eq!(pagination.current_page(), 1);
    /// ```
    #[must_use]
    pub const fn new(start_page: u32, page_size: usize) -> Self {
        Self {
            start_page,
            current_page: start_page,
            page_size,
            enabled: false,
        }
    }

    #[must_use]
    pub const fn start_page(&self) -> u32 {
        self.start_page
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether infinite scroll is switched on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Rewinds to the start page.
    pub fn reset(&mut self) {
        self.current_page = self.start_page;
    }

    /// Moves to the next page and returns its number.
    pub fn advance(&mut self) -> u32 {
        self.current_page = self.current_page.saturating_add(1);
        self.current_page
    }

    /// Steps back one page after a failed request, never past the start page.
    pub fn retreat(&mut self) {
        if self.current_page > self.start_page {
            self.current_page -= 1;
        }
    }

    /// Full-page heuristic for end-of-data detection.
    ///
    /// True iff infinite scroll is enabled and the last batch held at least a
    /// full page. A short batch means the source ran dry. A final batch of
    /// exactly `page_size` rows cannot be told apart from "more exists".
    #[must_use]
    pub const fn should_fetch_more(&self, last_added: usize) -> bool {
        self.enabled && last_added >= self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn should_fetch_more_requires_a_full_page() {
        let mut pagination = Pagination::new(1, 20);
        pagination.set_enabled(true);

        assert!(!pagination.should_fetch_more(0));
        assert!(!pagination.should_fetch_more(19));
        assert!(pagination.should_fetch_more(20));
        assert!(pagination.should_fetch_more(35));
    }

    #[test]
    fn should_fetch_more_is_false_when_disabled() {
        let pagination = Pagination::new(0, 20);
        assert!(!pagination.should_fetch_more(20));
    }


    #[test]
    fn retreat_stops_at_start_page() {
        let mut pagination = Pagination::new(3, 10);
        assert_eq!(pagination.advance(), 4);
        pagination.retreat();
        pagination.retreat();
        assert_eq!(pagination.current_page(), 3);
    }

    proptest! {
        #[test]
        fn should_fetch_more_is_the_page_size_threshold(
            page_size in 0usize..512,
            count in 0usize..2048,
            enabled in any::<bool>(),
        ) {
            let mut pagination = Pagination::new(0, page_size);
            pagination.set_enabled(enabled);
            prop_assert_eq!(pagination.should_fetch_more(count), enabled && count >= page_size);
        }

        #[test]
        fn current_page_never_drops_below_start(
            start in 0u32..1000,
            steps in prop::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut pagination = Pagination::new(start, 20);
            for forward in steps {
                if forward {
                    pagination.advance();
                } else {
                    pagination.retreat();
                }
                prop_assert!(pagination.current_page() >= start);
            }
            pagination.reset();
            prop_assert_eq!(pagination.current_page(), start);
        }
    }
}
