//! Durable object storage port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::drawing::ImageRef;

/// Port for storing generated images permanently.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Download `source_url` and store it under `key`.
    ///
    /// Returns the permanent public URL together with the key.
    async fn upload_from_url(&self, source_url: &str, key: &str) -> Result<ImageRef, ObjectStorageError>;
}

/// Object storage errors.
#[derive(Debug, Clone, Error)]
pub enum ObjectStorageError {
    /// Fetching the source failed.
    #[error("download failed: {0}")]
    Download(String),

    /// Writing the object failed.
    #[error("io error: {0}")]
    Io(String),

    /// The key is empty or escapes the storage root.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
}

impl From<std::io::Error> for ObjectStorageError {
    fn from(err: std::io::Error) -> Self {
        ObjectStorageError::Io(err.to_string())
    }
}
