//! Error types for biolab-content

use thiserror::Error;

/// Unified error type for all content operations
#[derive(Error, Debug)]
pub enum ContentError {
    // ─── Table Store Errors ───

    #[error("Row not found: table={table}, id={id}")]
    RowNotFound { table: String, id: String },

    #[error("Table store error: {0}")]
    TableStore(String),

    // ─── File Storage Errors ───

    #[error("Object not found: {bucket}/{path}")]
    ObjectNotFound { bucket: String, path: String },

    #[error("Storage error: {0}")]
    Storage(String),

    // ─── Infrastructure Errors ───

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        ContentError::TableStore(err.to_string())
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ContentError {
    fn from(err: url::ParseError) -> Self {
        ContentError::Config(format!("URL parse error: {err}"))
    }
}

/// Result type alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
