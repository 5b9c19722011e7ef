//! # BioLab Auth
//!
//! Session and role resolution core for the BioLab education platform —
//! bridges a hosted identity provider and a hosted `profiles` table into
//! one observable auth state, with route guards and role-derived
//! navigation on top.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                biolab-auth                  │
//! ├───────────────────┬───────────┬─────────────┤
//! │  SessionResolver  │ RouteGuard│  nav        │
//! │  (watch state,    │ (allow /  │ (menu from  │
//! │   sign-out)       │  redirect)│  role)      │
//! ├───────────────────┴───────────┴─────────────┤
//! │   SessionSource · ProfileStore · Navigator  │
//! │   (trait seams; memory + REST adapters)     │
//! ├─────────────────────────────────────────────┤
//! │          Hosted identity + tables           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use biolab_auth::navigator::NoopNavigator;
//! use biolab_auth::session::{MemoryProfileStore, MemorySessionSource, SessionResolver};
//! use biolab_auth::{nav, AuthConfig, RouteGuard};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = Arc::new(MemorySessionSource::new());
//!     let profiles = Arc::new(MemoryProfileStore::new());
//!
//!     let handle = SessionResolver::spawn(
//!         source,
//!         profiles,
//!         Arc::new(NoopNavigator),
//!         AuthConfig::new(),
//!     );
//!
//!     // Reactive read for a protected page
//!     let guard = RouteGuard::admin_only("/labs");
//!     let decision = guard.resolve(&mut handle.state()).await;
//!     println!("decision: {decision:?}");
//!
//!     // Menu derived from the resolved role
//!     let entries = nav::visible_entries(handle.current().role);
//!     println!("{} entries visible", entries.len());
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Single writer**: only the resolver mutates the shared state; every
//!   consumer reads through a watch channel
//! - **Fail open to guest**: read-path errors degrade to the
//!   unauthenticated state instead of surfacing
//! - **No stale roles**: role lookups carry a generation counter; results
//!   for a superseded user are discarded
//! - **Bounded loading**: a timeout guard unblocks consumers even when the
//!   provider never answers

pub mod config;
pub mod error;
pub mod guard;
pub mod nav;
pub mod navigator;
pub mod session;

// Re-exports for convenience
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use guard::{GuardDecision, RouteGuard};
pub use nav::{visible_entries, NavEntry};
pub use navigator::{MemoryNavigator, Navigator, NoopNavigator};
pub use session::{
    AuthChange, AuthState, AuthUser, ResolverHandle, Role, Session, SessionResolver,
    SessionSource,
};
