//! Route guards — per-page role checks with redirect decisions
//!
//! A guard never redirects while resolution is pending: bouncing a visitor
//! before their role loads would lock authorized users out. It re-evaluates
//! on every state change until the decision settles.

use tokio::sync::watch;
use tracing::debug;

use crate::session::{AuthState, Role};

/// Outcome of evaluating a guard against the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Resolution still pending — render nothing, decide later
    Pending,
    /// The visitor may see the page
    Allow,
    /// Resolved role is outside the allowed set — go to the fallback route
    Redirect(String),
}

/// Role check attached to a protected page
#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed_roles: Vec<Role>,
    fallback_route: String,
}

impl RouteGuard {
    pub fn new(allowed_roles: &[Role], fallback_route: impl Into<String>) -> Self {
        Self {
            allowed_roles: allowed_roles.to_vec(),
            fallback_route: fallback_route.into(),
        }
    }

    /// Shorthand for admin-only pages
    pub fn admin_only(fallback_route: impl Into<String>) -> Self {
        Self::new(&[Role::Admin], fallback_route)
    }

    /// Evaluate against a state snapshot.
    ///
    /// Only a resolved, non-null role outside the allowed set redirects;
    /// a visitor with no role at all is left to the page's own
    /// authentication handling.
    pub fn evaluate(&self, state: &AuthState) -> GuardDecision {
        if state.loading {
            return GuardDecision::Pending;
        }
        match state.role {
            Some(role) if !self.allowed_roles.contains(&role) => {
                debug!(role = %role, fallback = %self.fallback_route, "guard redirect");
                GuardDecision::Redirect(self.fallback_route.clone())
            }
            _ => GuardDecision::Allow,
        }
    }

    /// Await a settled decision, re-evaluating on every state transition.
    pub async fn resolve(&self, state: &mut watch::Receiver<AuthState>) -> GuardDecision {
        loop {
            let decision = self.evaluate(&state.borrow_and_update());
            if decision != GuardDecision::Pending {
                return decision;
            }
            if state.changed().await.is_err() {
                // Resolver gone; treat the last snapshot as settled.
                let last = state.borrow();
                return match last.role {
                    Some(role) if !self.allowed_roles.contains(&role) => {
                        GuardDecision::Redirect(self.fallback_route.clone())
                    }
                    _ => GuardDecision::Allow,
                };
            }
        }
    }
}
