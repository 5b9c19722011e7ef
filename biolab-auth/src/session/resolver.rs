//! SessionResolver — Tokio actor bridging the Session Source and the
//! Profile Store into one observable `AuthState`
//!
//! All state transitions are processed sequentially via an mpsc mailbox;
//! consumers read reactively through a watch channel, so there is exactly
//! one writer and any number of readers.
//!
//! Role lookups run as spawned tasks tagged with a generation counter: a
//! lookup that resolves after a newer session event has superseded it is
//! discarded instead of overwriting the newer user's role.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use biolab_auth::navigator::NoopNavigator;
//! use biolab_auth::session::{MemoryProfileStore, MemorySessionSource, SessionResolver};
//! use biolab_auth::{AuthConfig, Role};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = Arc::new(MemorySessionSource::new());
//!     let profiles = Arc::new(MemoryProfileStore::new());
//!     profiles.upsert("u1", Role::Teacher);
//!
//!     let handle = SessionResolver::spawn(
//!         source,
//!         profiles,
//!         Arc::new(NoopNavigator),
//!         AuthConfig::new(),
//!     );
//!
//!     let mut state = handle.state();
//!     while state.borrow().loading {
//!         if state.changed().await.is_err() {
//!             break;
//!         }
//!     }
//!     println!("resolved role: {:?}", handle.current().role);
//! }
//! ```

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::navigator::Navigator;

use super::profile::ProfileStore;
use super::source::SessionSource;
use super::types::{AuthChange, AuthState, Role, Session};

// ─── Actor Messages ───

enum ResolverMsg {
    InitialSession(Result<Option<Session>>),
    Change(AuthChange),
    RoleResolved {
        generation: u64,
        user_id: String,
        role: Option<Role>,
    },
    LoadingTimeout,
    SignOut {
        reply: oneshot::Sender<Result<()>>,
    },
}

// ─── Actor ───

/// Session resolver actor — the single writer of [`AuthState`]
pub struct SessionResolver {
    source: Arc<dyn SessionSource>,
    profiles: Arc<dyn ProfileStore>,
    navigator: Arc<dyn Navigator>,
    config: AuthConfig,
    state: watch::Sender<AuthState>,
    generation: u64,
    change_seen: bool,
    tx: mpsc::Sender<ResolverMsg>,
    rx: mpsc::Receiver<ResolverMsg>,
}

impl SessionResolver {
    /// Spawn the resolver and return a handle for reading state and
    /// signing out.
    ///
    /// Registers the change subscription before anything else so no event
    /// can slip past, then kicks off the timeout guard and the initial
    /// session fetch concurrently.
    pub fn spawn(
        source: Arc<dyn SessionSource>,
        profiles: Arc<dyn ProfileStore>,
        navigator: Arc<dyn Navigator>,
        config: AuthConfig,
    ) -> ResolverHandle {
        let (tx, rx) = mpsc::channel(64);
        let (state_tx, state_rx) = watch::channel(AuthState::unresolved());

        // Subscribe synchronously: events emitted from here on are queued,
        // not lost.
        let events = source.subscribe();
        let event_tx = tx.clone();
        tokio::spawn(Self::pump_changes(events, event_tx));

        // Liveness fallback: unblock `loading` even if the provider never
        // answers. Does not abort the in-flight fetch.
        let guard_tx = tx.clone();
        let timeout = config.resolve_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = guard_tx.send(ResolverMsg::LoadingTimeout).await;
        });

        // Initial fetch.
        let fetch_tx = tx.clone();
        let fetch_source = Arc::clone(&source);
        tokio::spawn(async move {
            let result = fetch_source.current_session().await;
            let _ = fetch_tx.send(ResolverMsg::InitialSession(result)).await;
        });

        let actor = Self {
            source,
            profiles,
            navigator,
            config,
            state: state_tx,
            generation: 0,
            change_seen: false,
            tx: tx.clone(),
            rx,
        };
        tokio::spawn(actor.run());
        info!("SessionResolver spawned");

        ResolverHandle {
            tx,
            state: state_rx,
        }
    }

    async fn pump_changes(
        mut events: broadcast::Receiver<AuthChange>,
        tx: mpsc::Sender<ResolverMsg>,
    ) {
        loop {
            match events.recv().await {
                Ok(change) => {
                    if tx.send(ResolverMsg::Change(change)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session change stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                ResolverMsg::InitialSession(_) if self.change_seen => {
                    // A change event already resolved fresher state; the
                    // initial snapshot is stale by definition.
                    debug!("initial session fetch superseded by change events");
                }
                ResolverMsg::InitialSession(Ok(session)) => {
                    debug!(found = session.is_some(), "initial session fetched");
                    self.resolve(session);
                }
                ResolverMsg::InitialSession(Err(e)) => {
                    // Degrade to unauthenticated; never crash the UI over a
                    // read-path failure.
                    warn!(error = %e, "initial session fetch failed");
                    self.state.send_modify(|st| st.loading = false);
                }
                ResolverMsg::Change(AuthChange::SignedIn(session))
                | ResolverMsg::Change(AuthChange::TokenRefreshed(session)) => {
                    self.change_seen = true;
                    self.resolve(Some(session));
                }
                ResolverMsg::Change(AuthChange::SignedOut) => {
                    self.change_seen = true;
                    self.resolve(None);
                    // Hard navigation doubles as cross-component cache
                    // invalidation. Idempotent with the sign_out() path.
                    self.navigator.navigate(&self.config.root_route);
                }
                ResolverMsg::RoleResolved {
                    generation,
                    user_id,
                    role,
                } => {
                    self.apply_role(generation, &user_id, role);
                }
                ResolverMsg::LoadingTimeout => {
                    if self.state.borrow().loading {
                        warn!("resolution timeout reached, unblocking consumers");
                        self.state.send_modify(|st| st.loading = false);
                    }
                }
                ResolverMsg::SignOut { reply } => {
                    let _ = reply.send(self.handle_sign_out().await);
                }
            }
        }
        info!("SessionResolver stopped");
    }

    /// Single state-transition function shared by the initial fetch and
    /// every change event.
    fn resolve(&mut self, session: Option<Session>) {
        self.generation = self.generation.wrapping_add(1);

        match session {
            Some(session) => {
                let user = session.user.clone();
                let user_changed = self
                    .state
                    .borrow()
                    .user
                    .as_ref()
                    .map(|u| u.id != user.id)
                    .unwrap_or(true);

                self.state.send_modify(|st| {
                    if user_changed {
                        // The old role belongs to the old user; never show it
                        // next to the new identity while the lookup runs.
                        st.role = None;
                    }
                    st.user = Some(user.clone());
                    st.session = Some(session);
                    // `loading` stays as it is: the cycle completes when the
                    // role lookup for this generation lands (see apply_role),
                    // so guards keep waiting through the initial lookup.
                });

                self.spawn_role_lookup(user.id, self.generation);
            }
            None => {
                self.state.send_modify(|st| {
                    st.user = None;
                    st.session = None;
                    st.role = None;
                    st.loading = false;
                });
            }
        }
    }

    fn spawn_role_lookup(&self, user_id: String, generation: u64) {
        let profiles = Arc::clone(&self.profiles);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let role = match profiles.role_for_user(&user_id).await {
                Ok(role) => role,
                Err(e) => {
                    // Fail open to "no elevated privileges".
                    warn!(error = %e, user_id = %user_id, "role lookup failed");
                    None
                }
            };
            let _ = tx
                .send(ResolverMsg::RoleResolved {
                    generation,
                    user_id,
                    role,
                })
                .await;
        });
    }

    fn apply_role(&mut self, generation: u64, user_id: &str, role: Option<Role>) {
        if generation != self.generation {
            debug!(user_id, "discarding role lookup superseded by a newer session");
            return;
        }
        let user_matches = self
            .state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.id == user_id)
            .unwrap_or(false);
        if !user_matches {
            debug!(user_id, "discarding role lookup for a departed user");
            return;
        }

        debug!(user_id, role = ?role, "role resolved");
        self.state.send_modify(|st| {
            st.role = role;
            st.loading = false;
        });
    }

    async fn handle_sign_out(&mut self) -> Result<()> {
        // Optimistic local clear: guarded UI must not flash the previous
        // user's content while the provider round-trip is in flight. The
        // generation bump kills any in-flight role lookup.
        self.generation = self.generation.wrapping_add(1);
        self.state.send_modify(|st| {
            st.user = None;
            st.session = None;
            st.role = None;
            st.loading = true;
        });

        let result = self.source.sign_out().await;

        self.state.send_modify(|st| st.loading = false);
        self.navigator.navigate(&self.config.root_route);

        match result {
            Ok(()) => {
                info!("sign-out complete");
                Ok(())
            }
            Err(e) => {
                // Local state stays cleared; the caller may surface the
                // error but cannot use it to prevent logout.
                warn!(error = %e, "provider sign-out failed, local session already cleared");
                Err(e)
            }
        }
    }
}

// ─── Handle (client-facing API) ───

/// Cloneable handle to the resolver: reactive state reads plus `sign_out`
#[derive(Clone)]
pub struct ResolverHandle {
    tx: mpsc::Sender<ResolverMsg>,
    state: watch::Receiver<AuthState>,
}

impl ResolverHandle {
    /// Reactive view of the resolved state. `borrow()` for a snapshot,
    /// `changed().await` to wake on transitions.
    pub fn state(&self) -> watch::Receiver<AuthState> {
        self.state.clone()
    }

    /// Snapshot of the current state
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// End the session. Local state is cleared before the provider call;
    /// on failure the error is returned after the root navigation was
    /// still attempted. Safe to call repeatedly.
    pub async fn sign_out(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ResolverMsg::SignOut { reply })
            .await
            .map_err(|_| AuthError::ResolverUnavailable("SessionResolver".into()))?;
        rx.await
            .map_err(|_| AuthError::ResolverUnavailable("SessionResolver dropped".into()))?
    }
}
