//! Auth domain types — Role, AuthUser, Session, AuthChange, AuthState
//!
//! Serializable, cloneable, and cheap to pass around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application roles assigned through the hosted `profiles` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Parse a role string from a profile row.
    ///
    /// Unknown strings map to `None` — an unrecognized role carries no
    /// privileges, same as a missing profile.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attributes carried inside a session bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// A cached copy of the identity provider's session bundle.
///
/// The provider owns the session lifecycle; this struct is replaced whenever
/// the provider emits a change event and cleared when sign-out completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

/// Session-change notifications emitted by a [`SessionSource`]
///
/// [`SessionSource`]: crate::session::SessionSource
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Extra attributes supplied at registration time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpAttributes {
    pub full_name: Option<String>,
    pub requested_role: Option<Role>,
}

/// The resolved authentication state shared with every consumer.
///
/// Written only by the resolver; read reactively through a watch channel.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
    pub role: Option<Role>,
    pub loading: bool,
}

impl AuthState {
    /// Initial state: nothing resolved yet, loading until the first
    /// resolution attempt completes or the timeout guard fires.
    pub fn unresolved() -> Self {
        Self {
            user: None,
            session: None,
            role: None,
            loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// `user = None` must always imply `role = None`
    pub fn holds_invariants(&self) -> bool {
        self.user.is_some() || self.role.is_none()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::unresolved()
    }
}
