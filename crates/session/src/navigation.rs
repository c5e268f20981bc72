//! Navigation seam between the engine and the host's router.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Client-side route change; the current context survives.
    Soft,
    /// Full reload of the target; every rendered view is discarded.
    Hard,
}

pub trait Navigator {
    fn navigate(&self, path: &str, mode: NavigationMode);
}

/// Navigator that records where it was sent instead of going there.
///
/// Used by headless hosts and tests. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    visits: Rc<RefCell<Vec<(String, NavigationMode)>>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<(String, NavigationMode)> {
        self.visits.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, NavigationMode)> {
        self.visits.borrow().last().cloned()
    }

    pub fn was_sent_to(&self, path: &str) -> bool {
        self.visits.borrow().iter().any(|(p, _)| p == path)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str, mode: NavigationMode) {
        tracing::debug!(path, ?mode, "navigate");
        self.visits.borrow_mut().push((path.to_string(), mode));
    }
}
