//! Object storage for uploaded course documents.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::server::error::storage::StorageError;

/// Lifetime of download links in seconds.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;

/// Bucket-scoped object store. Paths are relative to the bucket root.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path`, failing if the object already exists.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Reads an object; a missing object is `StorageError::ObjectNotFound`.
    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Creates a time-limited public URL for an object.
    async fn signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, StorageError>;

    /// Deletes objects; unknown paths are ignored.
    async fn remove(&self, paths: &[String]) -> Result<(), StorageError>;
}

/// Supabase Storage REST client using the service role key.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    key: String,
    bucket: String,
}

#[derive(Deserialize)]
struct SignedUrlReply {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    /// Creates a client for one bucket.
    ///
    /// # Arguments
    /// - `client` - Shared HTTP client
    /// - `base_url` - Project URL such as `https://xyz.supabase.co`
    /// - `key` - Service role key used for both `apikey` and bearer auth
    /// - `bucket` - Bucket name
    pub fn new(client: reqwest::Client, base_url: &str, key: &str, bucket: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, scope: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}{}/{}",
            self.base_url,
            scope,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.key).header("apikey", &self.key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Supabase answers 400 with a "not found" body for missing objects.
fn is_missing(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.post(self.object_url("", path)))
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let response = self
            .authorized(self.client.head(self.object_url("authenticated/", path)))
            .send()
            .await?;

        let status = response.status();
        if is_missing(status) {
            return Ok(false);
        }

        Self::check(response).await?;

        Ok(true)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .authorized(self.client.get(self.object_url("authenticated/", path)))
            .send()
            .await?;

        if is_missing(response.status()) {
            return Err(StorageError::ObjectNotFound(path.to_string()));
        }

        let bytes = Self::check(response).await?.bytes().await?;

        Ok(bytes.to_vec())
    }

    async fn signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, StorageError> {
        let response = self
            .authorized(self.client.post(self.object_url("sign/", path)))
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await?;

        if is_missing(response.status()) {
            return Err(StorageError::ObjectNotFound(path.to_string()));
        }

        let reply: SignedUrlReply = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        Ok(format!("{}/storage/v1{}", self.base_url, reply.signed_url))
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .authorized(
                self.client
                    .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket)),
            )
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }
}
