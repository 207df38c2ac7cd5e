//! Pull-to-refresh lifecycle.

/// Tracks whether a pull-to-refresh is waiting for data to settle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    active: bool,
}

impl Refresh {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Starts a refresh; returns `false` if one was already running.
    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.active, true)
    }

    /// Ends a running refresh; returns `false` if none was running.
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_and_finish_toggle_once() {
        let mut refresh = Refresh::default();
        assert!(!refresh.finish());
        assert!(refresh.begin());
        assert!(!refresh.begin());
        assert!(refresh.is_active());
        assert!(refresh.finish());
        assert!(!refresh.is_active());
    }
}
