//! Object storage for rendered reports.
//!
//! Reports are uploaded to a Supabase Storage bucket and handed to the caller
//! as a time-limited signed URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

const DEFAULT_BUCKET: &str = "relatorios";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage configuration missing: {0}")]
    MissingConfig(&'static str),
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage response missing signed URL")]
    MissingSignedUrl,
}

#[async_trait]
pub trait ObjectStorage {
    /// Upload (or overwrite) an object at `path`.
    async fn upload_file(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn delete_file(&self, path: &str) -> Result<(), StorageError>;

    /// Produce an absolute URL granting read access to `path` for `expires_in_secs`.
    async fn create_signed_url(
        &self,
        path: &str,
        expires_in_secs: u64,
    ) -> Result<String, StorageError>;
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub bucket_name: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, StorageError> {
        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| StorageError::MissingConfig("SUPABASE_URL"))?;
        let supabase_key = env::var("SUPABASE_SERVICE_KEY")
            .or_else(|_| env::var("SUPABASE_ANON_KEY"))
            .map_err(|_| StorageError::MissingConfig("SUPABASE_SERVICE_KEY"))?;
        let bucket_name = env::var("BUCKET_NAME").unwrap_or_else(|_| {
            log::warn!("BUCKET_NAME not set, using default bucket '{}'", DEFAULT_BUCKET);
            DEFAULT_BUCKET.to_string()
        });

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_key,
            bucket_name,
        })
    }

    /// `{url}/storage/v1/object/{bucket}/{path}`
    pub fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.supabase_url,
            self.bucket_name,
            path.trim_start_matches('/')
        )
    }

    pub fn sign_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.supabase_url,
            self.bucket_name,
            path.trim_start_matches('/')
        )
    }

    /// Supabase returns signed URLs relative to `/storage/v1`.
    pub fn absolute_signed_url(&self, signed_path: &str) -> String {
        if signed_path.starts_with("http://") || signed_path.starts_with("https://") {
            return signed_path.to_string();
        }
        format!(
            "{}/storage/v1/{}",
            self.supabase_url,
            signed_path.trim_start_matches('/')
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: Option<String>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    prefixes: Vec<&'a str>,
}

pub struct SupabaseStorage {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.config.supabase_key))
            .header("apikey", &self.config.supabase_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(StorageError::Status { status, body })
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload_file(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        log::debug!("Uploading {} bytes to {}", data.len(), path);
        let response = self
            .authorized(self.client.post(self.config.object_url(path)))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(data.to_vec())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}",
            self.config.supabase_url, self.config.bucket_name
        );
        let response = self
            .authorized(self.client.delete(url))
            .json(&DeleteRequest {
                prefixes: vec![path],
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_signed_url(
        &self,
        path: &str,
        expires_in_secs: u64,
    ) -> Result<String, StorageError> {
        let response = self
            .authorized(self.client.post(self.config.sign_url(path)))
            .json(&SignRequest {
                expires_in: expires_in_secs,
            })
            .send()
            .await?;
        let signed: SignResponse = Self::check(response).await?.json().await?;
        let signed_path = signed.signed_url.ok_or(StorageError::MissingSignedUrl)?;
        Ok(self.config.absolute_signed_url(&signed_path))
    }
}
