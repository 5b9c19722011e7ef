//! Session and role resolution — the Session Source and Profile Store
//! seams, the resolver actor, and the state it publishes

mod profile;
mod resolver;
mod source;
mod types;

#[cfg(feature = "rest")]
mod rest;

pub use profile::{MemoryProfileStore, ProfileStore};
pub use resolver::{ResolverHandle, SessionResolver};
pub use source::{MemorySessionSource, SessionSource};
pub use types::{AuthChange, AuthState, AuthUser, Role, Session, SignUpAttributes};

#[cfg(feature = "rest")]
pub use rest::{RestProfileStore, RestSessionSource};
