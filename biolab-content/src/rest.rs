//! REST client for the hosted table store
//!
//! One `ContentClient` per project; collection accessors expose typed CRUD
//! against the fixed material tables. Listings come back newest first, the
//! order every page in the app displays.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{ContentError, Result};
use crate::types::{
    Lab, NewLab, NewSteamProject, NewStudentMaterial, NewTeacherMaterial, SteamProject,
    StudentMaterial, TeacherMaterial,
};

const HTTP_TIMEOUT_SECS: u64 = 30;

pub(crate) const TABLE_LABS: &str = "labs";
pub(crate) const TABLE_STEAM: &str = "steam_projects";
pub(crate) const TABLE_TEACHER_MATERIALS: &str = "teachers_materials";
pub(crate) const TABLE_STUDENT_MATERIALS: &str = "students_materials";

/// Client for the hosted table store's REST surface
#[derive(Clone)]
pub struct ContentClient {
    core: Arc<RestCore>,
}

struct RestCore {
    http: Client,
    base: String,
    api_key: String,
    bearer: RwLock<Option<String>>,
}

impl ContentClient {
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
            core: Arc::new(RestCore {
                http,
                base: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.into(),
                bearer: RwLock::new(None),
            }),
        })
    }

    /// Attach the signed-in user's access token; writes are rejected by the
    /// hosted policies without it.
    pub fn set_bearer(&self, token: Option<String>) {
        *self.core.bearer.write() = token;
    }

    pub fn labs(&self) -> LabsApi<'_> {
        LabsApi { core: &self.core }
    }

    pub fn steam(&self) -> SteamApi<'_> {
        SteamApi { core: &self.core }
    }

    pub fn teacher_materials(&self) -> TeacherMaterialsApi<'_> {
        TeacherMaterialsApi { core: &self.core }
    }

    pub fn student_materials(&self) -> StudentMaterialsApi<'_> {
        StudentMaterialsApi { core: &self.core }
    }
}

impl RestCore {
    fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        match self.bearer.read().clone() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn expect_success(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ContentError::TableStore(format!(
            "{context}: HTTP {status}: {body}"
        )))
    }

    async fn list<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let request = self
            .http
            .get(self.table_endpoint(table))
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.authorize(request).send().await?;
        let response = Self::expect_success(response, table).await?;
        let rows: Vec<T> = response.json().await?;
        debug!(table, rows = rows.len(), "listed");
        Ok(rows)
    }

    async fn get_one<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<T> {
        let request = self
            .http
            .get(self.table_endpoint(table))
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ]);
        let response = self.authorize(request).send().await?;
        let response = Self::expect_success(response, table).await?;
        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(ContentError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(rows.remove(0))
    }

    async fn insert<T: DeserializeOwned, B: Serialize>(&self, table: &str, row: &B) -> Result<T> {
        let request = self
            .http
            .post(self.table_endpoint(table))
            .header("Prefer", "return=representation")
            .json(&[row]);
        let response = self.authorize(request).send().await?;
        let response = Self::expect_success(response, table).await?;
        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(ContentError::TableStore(format!(
                "{table}: insert returned no representation"
            )));
        }
        debug!(table, "inserted");
        Ok(rows.remove(0))
    }

    async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        id: &str,
        changes: &B,
    ) -> Result<T> {
        let request = self
            .http
            .patch(self.table_endpoint(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(changes);
        let response = self.authorize(request).send().await?;
        let response = Self::expect_success(response, table).await?;
        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(ContentError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        debug!(table, id, "updated");
        Ok(rows.remove(0))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.table_endpoint(table))
            .query(&[("id", format!("eq.{id}"))]);
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(table, id, "deleted");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ContentError::TableStore(format!(
                "{table}: delete HTTP {status}: {body}"
            )))
        }
    }
}

// ─── Typed collection APIs ───

pub struct LabsApi<'a> {
    core: &'a RestCore,
}

impl LabsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Lab>> {
        self.core.list(TABLE_LABS).await
    }

    pub async fn get(&self, id: &str) -> Result<Lab> {
        self.core.get_one(TABLE_LABS, id).await
    }

    pub async fn create(&self, new: &NewLab) -> Result<Lab> {
        self.core.insert(TABLE_LABS, new).await
    }

    pub async fn update(&self, id: &str, changes: &NewLab) -> Result<Lab> {
        self.core.update(TABLE_LABS, id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.core.delete(TABLE_LABS, id).await
    }
}

pub struct SteamApi<'a> {
    core: &'a RestCore,
}

impl SteamApi<'_> {
    pub async fn list(&self) -> Result<Vec<SteamProject>> {
        self.core.list(TABLE_STEAM).await
    }

    pub async fn get(&self, id: &str) -> Result<SteamProject> {
        self.core.get_one(TABLE_STEAM, id).await
    }

    pub async fn create(&self, new: &NewSteamProject) -> Result<SteamProject> {
        self.core.insert(TABLE_STEAM, new).await
    }

    pub async fn update(&self, id: &str, changes: &NewSteamProject) -> Result<SteamProject> {
        self.core.update(TABLE_STEAM, id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.core.delete(TABLE_STEAM, id).await
    }
}

pub struct TeacherMaterialsApi<'a> {
    core: &'a RestCore,
}

impl TeacherMaterialsApi<'_> {
    pub async fn list(&self) -> Result<Vec<TeacherMaterial>> {
        self.core.list(TABLE_TEACHER_MATERIALS).await
    }

    pub async fn get(&self, id: &str) -> Result<TeacherMaterial> {
        self.core.get_one(TABLE_TEACHER_MATERIALS, id).await
    }

    pub async fn create(&self, new: &NewTeacherMaterial) -> Result<TeacherMaterial> {
        self.core.insert(TABLE_TEACHER_MATERIALS, new).await
    }

    pub async fn update(
        &self,
        id: &str,
        changes: &NewTeacherMaterial,
    ) -> Result<TeacherMaterial> {
        self.core.update(TABLE_TEACHER_MATERIALS, id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.core.delete(TABLE_TEACHER_MATERIALS, id).await
    }
}

pub struct StudentMaterialsApi<'a> {
    core: &'a RestCore,
}

impl StudentMaterialsApi<'_> {
    pub async fn list(&self) -> Result<Vec<StudentMaterial>> {
        self.core.list(TABLE_STUDENT_MATERIALS).await
    }

    pub async fn get(&self, id: &str) -> Result<StudentMaterial> {
        self.core.get_one(TABLE_STUDENT_MATERIALS, id).await
    }

    pub async fn create(&self, new: &NewStudentMaterial) -> Result<StudentMaterial> {
        self.core.insert(TABLE_STUDENT_MATERIALS, new).await
    }

    pub async fn update(
        &self,
        id: &str,
        changes: &NewStudentMaterial,
    ) -> Result<StudentMaterial> {
        self.core.update(TABLE_STUDENT_MATERIALS, id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.core.delete(TABLE_STUDENT_MATERIALS, id).await
    }
}
