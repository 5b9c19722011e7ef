//! Error types for biolab-auth — Railway Programming
//!
//! Read-path failures (session fetch, role lookup, change handling) are
//! absorbed by the resolver and logged; only `sign_out` and the direct
//! provider calls surface errors to callers.

use thiserror::Error;

/// Unified error type for all auth operations
#[derive(Error, Debug)]
pub enum AuthError {
    // ─── Provider Errors ───

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Sign-up incomplete: {0}")]
    SignUpIncomplete(String),

    #[error("Session provider error: {0}")]
    Provider(String),

    #[error("Sign-out failed: {0}")]
    SignOutFailed(String),

    // ─── Profile Errors ───

    #[error("Profile lookup failed: {0}")]
    ProfileLookup(String),

    // ─── Infrastructure Errors ───

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Serialization(err.to_string())
    }
}

#[cfg(feature = "rest")]
impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Provider(err.to_string())
    }
}

#[cfg(feature = "rest")]
impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        AuthError::Config(format!("URL parse error: {err}"))
    }
}

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;
