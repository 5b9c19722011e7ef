//! File storage seam — the upload endpoint boundary
//!
//! Material attachments (images, worksheets, videos) live in a hosted
//! object store. The app only ever uploads, removes, and links by public
//! URL; everything else about the endpoint is opaque.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::{ContentError, Result};

const HTTP_TIMEOUT_SECS: u64 = 60;

/// Hosted object-store operations consumed by the material forms
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` under `bucket/path` and return the public URL.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    /// Remove the object at `bucket/path`.
    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;
}

/// In-memory object store for tests and offline development
pub struct MemoryFileStorage {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    pub fn content_type_of(&self, bucket: &str, path: &str) -> Option<String> {
        self.objects
            .read()
            .get(&(bucket.to_string(), path.to_string()))
            .map(|object| object.content_type.clone())
    }
}

impl Default for MemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.objects.write().insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{bucket}/{path}"))
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let removed = self
            .objects
            .write()
            .remove(&(bucket.to_string(), path.to_string()));
        match removed {
            Some(object) => {
                debug!(bucket, path, bytes = object.bytes.len(), "object removed");
                Ok(())
            }
            None => Err(ContentError::ObjectNotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

/// Hosted object-store client
pub struct RestFileStorage {
    http: Client,
    base: String,
    api_key: String,
    bearer: RwLock<Option<String>>,
}

impl RestFileStorage {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(ContentError::Config(format!("not a base URL: {base_url}")));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ContentError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bearer: RwLock::new(None),
        })
    }

    pub fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write() = token;
    }

    fn object_endpoint(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base, bucket, path)
    }

    /// Public URL of an object in a public bucket
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base, bucket, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        match self.bearer.read().clone() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl FileStorage for RestFileStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let request = self
            .http
            .post(self.object_endpoint(bucket, path))
            .header("Content-Type", content_type)
            .body(bytes);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ContentError::Storage(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Storage(format!(
                "upload {bucket}/{path}: HTTP {status}: {body}"
            )));
        }

        info!(bucket, path, "object uploaded");
        Ok(self.public_url(bucket, path))
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let request = self.http.delete(self.object_endpoint(bucket, path));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ContentError::Storage(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::ObjectNotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Storage(format!(
                "remove {bucket}/{path}: HTTP {status}: {body}"
            )));
        }
        Ok(())
    }
}
