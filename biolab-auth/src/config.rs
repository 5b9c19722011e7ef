//! Configuration for the session resolver

use std::time::Duration;

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Liveness fallback: force `loading = false` if no resolution attempt
    /// completes within this window (default: 10 000 ms)
    pub resolve_timeout: Duration,

    /// Route targeted by the hard navigation after sign-out
    pub root_route: String,

    /// Route guards redirect to when a resolved role is not allowed
    pub fallback_route: String,
}

impl AuthConfig {
    /// Config with sensible defaults
    pub fn new() -> Self {
        Self {
            resolve_timeout: Duration::from_millis(10_000),
            root_route: "/".to_string(),
            fallback_route: "/labs".to_string(),
        }
    }

    /// Override the loading-timeout window
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Override the post-sign-out navigation target
    pub fn with_root_route(mut self, route: impl Into<String>) -> Self {
        self.root_route = route.into();
        self
    }

    /// Override the guard fallback route
    pub fn with_fallback_route(mut self, route: impl Into<String>) -> Self {
        self.fallback_route = route.into();
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
