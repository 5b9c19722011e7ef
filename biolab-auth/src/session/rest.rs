//! REST adapters for the hosted backend
//!
//! [`RestSessionSource`] speaks the identity provider's password-grant,
//! signup, and logout endpoints; [`RestProfileStore`] reads the `profiles`
//! table through the table-store REST surface. Both are thin: the hosted
//! backend's behavior stays opaque, and every response is treated as
//! untrusted input.

use chrono::DateTime;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AuthError, Result};

use super::profile::ProfileStore;
use super::source::{SessionSource, CHANGE_CHANNEL_CAPACITY};
use super::types::{AuthChange, AuthUser, Role, Session, SignUpAttributes};

use async_trait::async_trait;

const HTTP_TIMEOUT_SECS: u64 = 30;

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| AuthError::Config(e.to_string()))
}

fn normalize_base(base_url: &str) -> Result<String> {
    // Validate eagerly so a typo fails at construction, not first use.
    let parsed = Url::parse(base_url)?;
    if parsed.cannot_be_a_base() {
        return Err(AuthError::Config(format!("not a base URL: {base_url}")));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

// ─── Wire types ───

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Signup may answer with a full session or, when the project requires
/// email confirmation, with a bare user object.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    user: Option<RemoteUser>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: String,
}

fn session_from_parts(token: String, expires_at: Option<i64>, user: RemoteUser) -> Session {
    Session {
        access_token: token,
        expires_at: expires_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        user: AuthUser {
            email: user.email.unwrap_or_default(),
            id: user.id,
        },
    }
}

// ─── Session Source ───

/// Identity-provider client for a hosted project
pub struct RestSessionSource {
    http: Client,
    base: String,
    api_key: String,
    active: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
}

impl RestSessionSource {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let (events, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            http: build_client()?,
            base: normalize_base(base_url)?,
            api_key: api_key.into(),
            active: RwLock::new(None),
            events,
        })
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base, path)
    }

    fn store(&self, session: Session) -> Session {
        *self.active.write() = Some(session.clone());
        session
    }
}

#[async_trait]
impl SessionSource for RestSessionSource {
    async fn current_session(&self) -> Result<Option<Session>> {
        // The provider hands out the bundle at sign-in; between change
        // events the cached copy is authoritative for this process.
        Ok(self.active.read().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(self.auth_endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!("sign-in HTTP {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        let session = session_from_parts(token.access_token, token.expires_at, token.user);
        info!(email = %email, "sign-in succeeded");

        let session = self.store(session);
        let _ = self.events.send(AuthChange::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: SignUpAttributes,
    ) -> Result<Session> {
        let response = self
            .http
            .post(self.auth_endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": attributes,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::CONFLICT {
            return Err(AuthError::UserAlreadyExists(email.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!("sign-up HTTP {status}: {body}")));
        }

        let parsed: SignUpResponse = response.json().await?;
        match (parsed.access_token, parsed.user) {
            (Some(token), Some(user)) => {
                let session = session_from_parts(token, parsed.expires_at, user);
                info!(email = %email, "sign-up succeeded");
                let session = self.store(session);
                let _ = self.events.send(AuthChange::SignedIn(session.clone()));
                Ok(session)
            }
            _ => Err(AuthError::SignUpIncomplete(
                "confirmation required before a session is issued".to_string(),
            )),
        }
    }

    async fn sign_out(&self) -> Result<()> {
        let previous = self.active.write().take();
        let Some(previous) = previous else {
            debug!("sign-out without an active session");
            return Ok(());
        };

        // Listeners settle on the local outcome regardless of what the
        // provider answers below.
        let _ = self.events.send(AuthChange::SignedOut);

        let response = self
            .http
            .post(self.auth_endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&previous.access_token)
            .send()
            .await
            .map_err(|e| AuthError::SignOutFailed(e.to_string()))?;

        let status = response.status();
        // An already-expired token means the session is gone either way.
        if status.is_success() || status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND
        {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "provider logout rejected");
            Err(AuthError::SignOutFailed(format!("HTTP {status}: {body}")))
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

// ─── Profile Store ───

/// `profiles` table client: `select role where user_id = X`
pub struct RestProfileStore {
    http: Client,
    base: String,
    api_key: String,
    bearer: RwLock<Option<String>>,
}

impl RestProfileStore {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base: normalize_base(base_url)?,
            api_key: api_key.into(),
            bearer: RwLock::new(None),
        })
    }

    /// Attach the signed-in user's access token so row-level policies see
    /// the caller, not the anonymous key.
    pub fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write() = token;
    }

    fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn role_for_user(&self, user_id: &str) -> Result<Option<Role>> {
        let mut request = self
            .http
            .get(self.table_endpoint("profiles"))
            .query(&[
                ("select", "role".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &self.api_key);
        if let Some(token) = self.bearer.read().clone() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::ProfileLookup(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ProfileLookup(format!("HTTP {status}: {body}")));
        }

        let rows: Vec<ProfileRow> = response
            .json()
            .await
            .map_err(|e| AuthError::ProfileLookup(e.to_string()))?;

        // Zero rows: no profile, no privileges. An unknown role string is
        // treated the same way.
        Ok(rows.first().and_then(|row| Role::parse(&row.role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let source =
            RestSessionSource::new("https://demo.example.co/", "anon-key").unwrap();
        assert_eq!(
            source.auth_endpoint("token"),
            "https://demo.example.co/auth/v1/token"
        );

        let profiles = RestProfileStore::new("https://demo.example.co", "anon-key").unwrap();
        assert_eq!(
            profiles.table_endpoint("profiles"),
            "https://demo.example.co/rest/v1/profiles"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RestSessionSource::new("not a url", "key").is_err());
    }

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1754468000,
            "user": { "id": "u-1", "email": "a@biolab.kz", "aud": "authenticated" }
        }"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        let session = session_from_parts(parsed.access_token, parsed.expires_at, parsed.user);
        assert_eq!(session.user.id, "u-1");
        assert_eq!(session.user.email, "a@biolab.kz");
        assert!(session.expires_at.is_some());
    }

    #[test]
    fn test_signup_without_session() {
        // Confirmation-required projects answer with a bare user object.
        let json = r#"{ "id": "u-2", "email": "b@biolab.kz" }"#;
        let parsed: SignUpResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.access_token.is_none());
        assert!(parsed.user.is_none());
    }

    #[test]
    fn test_profile_row_parsing() {
        let rows: Vec<ProfileRow> = serde_json::from_str(r#"[{"role": "teacher"}]"#).unwrap();
        assert_eq!(rows.first().and_then(|r| Role::parse(&r.role)), Some(Role::Teacher));

        let empty: Vec<ProfileRow> = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }
}
