//! Session Source seam — the hosted identity provider boundary
//!
//! The provider owns sign-in/sign-up/sign-out and session lifecycle; the
//! application only ever holds a cached copy of the bundle it hands out.
//! Change notifications fan out through a broadcast channel so the resolver
//! (and anything else) can subscribe independently.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::error::{AuthError, Result};

use super::types::{AuthChange, AuthUser, Session, SignUpAttributes};

/// Capacity of the change-notification channel. Events are tiny and
/// consumers drain promptly; lagging receivers skip to the newest event.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Hosted identity provider operations consumed by the resolver
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetch the currently active session, if any.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Register a new account and return its first session.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: SignUpAttributes,
    ) -> Result<Session>;

    /// End the active session.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to session-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}

/// In-memory identity provider for tests and offline development.
///
/// Accounts live in a map keyed by email; sessions expire after an hour but
/// expiry is never enforced locally — the hosted provider would do that.
pub struct MemorySessionSource {
    accounts: Mutex<HashMap<String, MemoryAccount>>,
    active: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
}

struct MemoryAccount {
    user_id: String,
    password: String,
}

impl MemorySessionSource {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            accounts: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            events,
        }
    }

    /// Seed an account without going through `sign_up`.
    pub fn seed_account(&self, email: &str, password: &str, user_id: &str) {
        self.accounts.lock().insert(
            email.to_string(),
            MemoryAccount {
                user_id: user_id.to_string(),
                password: password.to_string(),
            },
        );
    }

    /// Install a session directly and emit the matching change event.
    /// Lets tests drive the change stream without credential plumbing.
    pub fn install_session(&self, session: Session) {
        *self.active.lock() = Some(session.clone());
        let _ = self.events.send(AuthChange::SignedIn(session));
    }

    fn issue(&self, user_id: &str, email: &str) -> Session {
        Session {
            access_token: Uuid::new_v4().to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            user: AuthUser {
                id: user_id.to_string(),
                email: email.to_string(),
            },
        }
    }
}

impl Default for MemorySessionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionSource for MemorySessionSource {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.active.lock().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let user_id = {
            let accounts = self.accounts.lock();
            let account = accounts
                .get(email)
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password != password {
                return Err(AuthError::InvalidCredentials);
            }
            account.user_id.clone()
        };

        let session = self.issue(&user_id, email);
        *self.active.lock() = Some(session.clone());
        let _ = self.events.send(AuthChange::SignedIn(session.clone()));
        info!(email = %email, "memory sign-in");
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _attributes: SignUpAttributes,
    ) -> Result<Session> {
        {
            let accounts = self.accounts.lock();
            if accounts.contains_key(email) {
                return Err(AuthError::UserAlreadyExists(email.to_string()));
            }
        }

        let user_id = Uuid::new_v4().to_string();
        self.accounts.lock().insert(
            email.to_string(),
            MemoryAccount {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );

        let session = self.issue(&user_id, email);
        *self.active.lock() = Some(session.clone());
        let _ = self.events.send(AuthChange::SignedIn(session.clone()));
        info!(email = %email, "memory sign-up");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let had_session = self.active.lock().take().is_some();
        if had_session {
            let _ = self.events.send(AuthChange::SignedOut);
        }
        // Signing out without a session is a no-op, not an error.
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
