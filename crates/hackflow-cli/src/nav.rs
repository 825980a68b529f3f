//! Browser-like history for the terminal front-end.

use std::sync::{Mutex, MutexGuard};

use hackflow_core::{Navigator, Route};
use tracing::debug;

/// Stack of visited paths; the last entry is the current page
pub struct HistoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            entries: Mutex::new(vec![start.to_string()]),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> String {
        self.entries().last().cloned().unwrap_or_else(|| Route::Home.path().to_string())
    }

    /// Open an arbitrary path, adding a history entry
    pub fn open(&self, path: &str) {
        debug!(path, "Open");
        self.entries().push(path.to_string());
    }

    /// Go back one entry. False when already at the first entry.
    pub fn back(&self) -> bool {
        let mut entries = self.entries();
        if entries.len() > 1 {
            entries.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.entries().len()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: Route) {
        self.open(to.path());
    }

    fn redirect(&self, to: Route) {
        debug!(to = to.path(), "Redirect");
        let mut entries = self.entries();
        entries.pop();
        entries.push(to.path().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_grows_history() {
        let nav = HistoryNavigator::new("/login");
        nav.navigate(Route::Register);
        assert_eq!(nav.current(), "/register");
        assert_eq!(nav.depth(), 2);

        assert!(nav.back());
        assert_eq!(nav.current(), "/login");
        assert!(!nav.back());
        assert_eq!(nav.current(), "/login");
    }

    #[test]
    fn test_redirect_replaces_current_entry() {
        let nav = HistoryNavigator::new("/login");
        nav.open("/");
        nav.redirect(Route::Login);

        assert_eq!(nav.current(), "/login");
        assert_eq!(nav.depth(), 2);
        // Going back never lands on the blocked page
        assert!(nav.back());
        assert_eq!(nav.current(), "/login");
    }
}
