//! File store: the external host that keeps uploaded images.
//!
//! DESIGN
//! ======
//! The session only needs three remote operations: list, upload, and
//! delete-by-key. They sit behind the `FileStore` trait so the controller
//! and the cleanup sequencer can run against an in-memory mock in tests.
//! `UploadThingStore` is the production implementation.

pub mod uploadthing;

use serde::{Deserialize, Serialize};

use crate::slots::ImageRecord;

pub use uploadthing::UploadThingStore;

/// Upload size ceiling enforced before any bytes leave the process.
pub const MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request to the file host failed before a response arrived.
    #[error("file host request failed: {0}")]
    Request(String),

    /// The file host returned a non-success HTTP status.
    #[error("file host error: status {status}")]
    Response { status: u16, body: String },

    /// The file host response body could not be deserialized.
    #[error("file host response parse failed: {0}")]
    Parse(String),

    /// The upload was refused locally (size or content type).
    #[error("{0}")]
    Rejected(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_STORE_REQUEST",
            Self::Response { .. } => "E_STORE_RESPONSE",
            Self::Parse(_) => "E_STORE_PARSE",
            Self::Rejected(_) => "E_UPLOAD_REJECTED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// A file to send to the host.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Check the size ceiling and that the payload claims to be an image.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with a human-readable message.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.bytes.is_empty() {
            return Err(StoreError::Rejected("upload is empty".into()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(StoreError::Rejected(format!(
                "image is {} bytes; the limit is 4MB",
                self.bytes.len()
            )));
        }
        if !self.content_type.starts_with("image/") {
            return Err(StoreError::Rejected(format!("'{}' is not an image type", self.content_type)));
        }
        Ok(())
    }
}

/// Where the host put an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub key: String,
}

/// Category a listed file was uploaded under: the key prefix before the
/// first `_`.
#[must_use]
pub fn category_from_key(key: &str) -> &str {
    key.split('_').next().unwrap_or(key)
}

// =============================================================================
// FILE STORE TRAIT
// =============================================================================

/// Remote file host operations. Enables mocking in tests.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// List every stored file as an image record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the response is malformed.
    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError>;

    /// Upload one image.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if validation, presigning, or the transfer fails.
    async fn upload(&self, upload: Upload) -> Result<StoredFile, StoreError>;

    /// Delete one file by key. There is no batch form.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the host does not confirm the delete.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
