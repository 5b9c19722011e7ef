//! Navigator seam — the hard-navigation sink
//!
//! Sign-out ends with a full navigation to the application root so every
//! consumer's cached state is discarded at once. The resolver and the
//! sign-out change event may both request it; navigating to the route the
//! app is already on must be a no-op.

use parking_lot::Mutex;
use tracing::debug;

/// Where redirects and the post-sign-out reload go
pub trait Navigator: Send + Sync {
    /// Navigate to `route`. Repeated invocation with the same target must
    /// have at most one observable effect.
    fn navigate(&self, route: &str);
}

/// Navigator that swallows navigation requests.
///
/// For embedders that invalidate their own caches on the `SignedOut` change
/// event instead of reloading.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        debug!(route = %route, "navigation suppressed");
    }
}

/// Navigator that tracks the current route in memory.
///
/// Used by tests and by headless embedders that poll `current()` to drive
/// their own view layer.
pub struct MemoryNavigator {
    current: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_route: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(initial_route.into()),
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> String {
        self.current.lock().clone()
    }

    /// Number of navigations that actually changed the route
    pub fn effective_navigations(&self) -> usize {
        self.visits.lock().len()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visits.lock().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, route: &str) {
        let mut current = self.current.lock();
        if *current == route {
            debug!(route = %route, "already at target route");
            return;
        }
        *current = route.to_string();
        self.visits.lock().push(route.to_string());
    }
}
