//! Supabase storage bucket backend
//!
//! Objects are uploaded with the service role key. The stored location has
//! the form `supabase://{bucket}/{object}` so it can be deleted later without
//! depending on the project URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error};

use ap_core::services::FileStorageTrait;

use crate::InfrastructureError;

const URL_SCHEME: &str = "supabase://";

/// Upload timeout for a single object
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Result<Self, InfrastructureError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let bucket = bucket.trim().to_string();
        if base_url.is_empty() || service_key.trim().is_empty() || bucket.is_empty() {
            return Err(InfrastructureError::Config(
                "Supabase storage needs SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY and a bucket".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            service_key: service_key.trim().to_string(),
            bucket,
        })
    }

    fn object_endpoint(&self, object_name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, object_name)
    }

    fn stored_location(&self, object_name: &str) -> String {
        format!("{}{}/{}", URL_SCHEME, self.bucket, object_name)
    }

    /// Object name of a location in this bucket
    fn object_from_location<'a>(&self, file_url: &'a str) -> Option<&'a str> {
        let rest = file_url.strip_prefix(URL_SCHEME)?;
        let (bucket, object) = rest.split_once('/')?;
        (bucket == self.bucket && !object.is_empty()).then_some(object)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.service_key))
    }
}

#[async_trait]
impl FileStorageTrait for SupabaseStorage {
    async fn save(&self, object_name: &str, content_type: &str, data: Vec<u8>) -> Result<String, String> {
        let size = data.len();
        let response = self
            .authorized(self.client.post(self.object_endpoint(object_name)))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| format!("Supabase upload request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), object = object_name, "Supabase upload failed");
            return Err(format!("Supabase upload failed ({}): {}", status.as_u16(), body));
        }

        debug!(object = object_name, bytes = size, "Stored file in Supabase");
        Ok(self.stored_location(object_name))
    }

    async fn delete(&self, file_url: &str) -> Result<(), String> {
        let object_name = self
            .object_from_location(file_url)
            .ok_or_else(|| format!("Not a location in bucket {}: {}", self.bucket, file_url))?;

        let response = self
            .authorized(self.client.delete(self.object_endpoint(object_name)))
            .send()
            .await
            .map_err(|e| format!("Supabase delete request failed: {}", e))?;

        let status = response.status();
        // Already gone counts as deleted
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("Supabase delete failed ({}): {}", status.as_u16(), body))
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}
