//! Navigator that records routes instead of changing pages.

use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::Navigator;

#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route navigated to, oldest first.
    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_route(&self) -> Option<String> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "Navigating");
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_routes_in_order() {
        let navigator = RecordingNavigator::new();
        navigator.navigate("/budget");
        navigator.navigate("/fuel");
        assert_eq!(navigator.routes(), vec!["/budget", "/fuel"]);
        assert_eq!(navigator.last_route().as_deref(), Some("/fuel"));
    }

    #[test]
    fn clones_share_history() {
        let navigator = RecordingNavigator::new();
        let clone = navigator.clone();
        clone.navigate("/type");
        assert_eq!(navigator.routes(), vec!["/type"]);
    }
}
