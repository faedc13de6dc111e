//! UploadThing REST client.
//!
//! Uploads are two-step: `/v6/uploadFiles` presigns a storage POST, then
//! the bytes go straight to that URL as a multipart form. Listing and
//! deleting are single JSON calls authenticated with the API secret.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{FileStore, StoreError, StoredFile, Upload, category_from_key};
use crate::config::FileHostConfig;
use crate::slots::ImageRecord;

const API_KEY_HEADER: &str = "x-uploadthing-api-key";
const API_VERSION_HEADER: &str = "x-uploadthing-version";
const API_VERSION: &str = "6.4.0";

pub struct UploadThingStore {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    public_url: String,
}

impl UploadThingStore {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the HTTP client cannot be constructed.
    pub fn new(config: &FileHostConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            public_url: config.public_url.clone(),
        })
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, StoreError> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::Response { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl FileStore for UploadThingStore {
    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let text = self
            .send_json("/v6/listFiles", &ListRequest {})
            .await?;
        parse_list_response(&text, &self.public_url)
    }

    async fn upload(&self, upload: Upload) -> Result<StoredFile, StoreError> {
        upload.validate()?;

        let request = PresignRequest {
            files: vec![PresignFile { name: &upload.name, size: upload.bytes.len(), file_type: &upload.content_type }],
            acl: "public-read",
            content_disposition: "inline",
        };
        let text = self
            .send_json("/v6/uploadFiles", &request)
            .await?;
        let presigned = parse_presign_response(&text)?;

        let mut form = Form::new();
        for (name, value) in &presigned.fields {
            form = form.text(name.clone(), value.clone());
        }
        let part = Part::bytes(upload.bytes)
            .file_name(upload.name)
            .mime_str(&upload.content_type)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        form = form.part("file", part);

        let response = self
            .http
            .post(&presigned.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Response { status: status.as_u16(), body });
        }

        let url = presigned
            .file_url
            .unwrap_or_else(|| format!("{}/{}", self.public_url, presigned.key));
        Ok(StoredFile { url, key: presigned.key })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let text = self
            .send_json("/v6/deleteFiles", &DeleteRequest { file_keys: [key] })
            .await?;
        parse_delete_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ListRequest {}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<ListedFile>,
}

#[derive(Deserialize)]
struct ListedFile {
    key: String,
}

#[derive(Serialize)]
struct PresignRequest<'a> {
    files: Vec<PresignFile<'a>>,
    acl: &'static str,
    #[serde(rename = "contentDisposition")]
    content_disposition: &'static str,
}

#[derive(Serialize)]
struct PresignFile<'a> {
    name: &'a str,
    size: usize,
    #[serde(rename = "type")]
    file_type: &'a str,
}

#[derive(Deserialize)]
struct PresignResponse {
    #[serde(default)]
    data: Vec<PresignedUpload>,
}

#[derive(Debug, Deserialize)]
struct PresignedUpload {
    key: String,
    /// Storage endpoint that accepts the multipart POST.
    url: String,
    #[serde(default)]
    fields: BTreeMap<String, String>,
    #[serde(rename = "fileUrl")]
    file_url: Option<String>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    #[serde(rename = "fileKeys")]
    file_keys: [&'a str; 1],
}

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
}

fn parse_list_response(text: &str, public_url: &str) -> Result<Vec<ImageRecord>, StoreError> {
    let parsed: ListResponse = serde_json::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok(parsed
        .files
        .into_iter()
        .map(|file| ImageRecord {
            url: format!("{public_url}/{}", file.key),
            category: category_from_key(&file.key).to_string(),
            key: file.key,
        })
        .collect())
}

fn parse_presign_response(text: &str) -> Result<PresignedUpload, StoreError> {
    let parsed: PresignResponse = serde_json::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
    parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Parse("presign response has no upload slots".into()))
}

fn parse_delete_response(text: &str) -> Result<(), StoreError> {
    let parsed: DeleteResponse = serde_json::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
    if parsed.success {
        Ok(())
    } else {
        Err(StoreError::Response { status: 200, body: text.to_string() })
    }
}

#[cfg(test)]
#[path = "uploadthing_test.rs"]
mod tests;
