//! Local Object Storage - durable image storage on the local filesystem.
//!
//! Objects live under a root directory and are served from a public base URL
//! (e.g. by a static file server or CDN in front of the directory).
//!
//! Uses a write-to-temp-then-rename pattern so a reader never sees a
//! partially written object.

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::drawing::ImageRef;
use crate::ports::{ObjectStorage, ObjectStorageError};

/// Largest object accepted from a download.
pub const MAX_OBJECT_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Filesystem-backed object storage.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
    client: Client,
}

impl LocalObjectStorage {
    /// Creates storage rooted at `root`, publishing under `public_base_url`.
    ///
    /// # Errors
    ///
    /// - `Io` if the HTTP client cannot be built
    pub fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        download_timeout: Duration,
    ) -> Result<Self, ObjectStorageError> {
        let client = Client::builder()
            .timeout(download_timeout)
            .build()
            .map_err(|e| ObjectStorageError::Io(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The public URL an object key is served from.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Writes `bytes` under `key` atomically.
    pub async fn store_bytes(&self, key: &str, bytes: &[u8]) -> Result<ImageRef, ObjectStorageError> {
        let relative = Self::validate_key(key)?;
        if bytes.len() > MAX_OBJECT_SIZE_BYTES {
            return Err(ObjectStorageError::Download(format!(
                "object is {} bytes, limit is {}",
                bytes.len(),
                MAX_OBJECT_SIZE_BYTES
            )));
        }

        let final_path = self.root.join(&relative);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ObjectStorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut temp_name = final_path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            ObjectStorageError::Io(format!("Failed to create temp file {}: {}", temp_path.display(), e))
        })?;
        file.write_all(bytes).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            ObjectStorageError::Io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::debug!(key, size = bytes.len(), "stored object");

        Ok(ImageRef {
            url: self.public_url(key),
            key: key.to_string(),
        })
    }

    /// Rejects empty keys and keys that could escape the root.
    fn validate_key(key: &str) -> Result<PathBuf, ObjectStorageError> {
        let path = Path::new(key);
        let safe = !key.trim().is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if safe {
            Ok(path.to_path_buf())
        } else {
            Err(ObjectStorageError::InvalidKey(key.to_string()))
        }
    }

    async fn download(&self, source_url: &str) -> Result<Vec<u8>, ObjectStorageError> {
        let response = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|e| ObjectStorageError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObjectStorageError::Download(format!(
                "GET {} returned {}",
                source_url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ObjectStorageError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload_from_url(&self, source_url: &str, key: &str) -> Result<ImageRef, ObjectStorageError> {
        Self::validate_key(key)?;
        let bytes = self.download(source_url).await?;
        self.store_bytes(key, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_storage() -> (LocalObjectStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalObjectStorage::new(
            temp_dir.path(),
            "http://localhost:8080/objects/",
            Duration::from_secs(5),
        )
        .unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn store_bytes_writes_file_and_returns_public_url() {
        let (storage, temp) = create_storage();

        let image = storage.store_bytes("topics/abc/1.png", b"png-bytes").await.unwrap();

        assert_eq!(image.url, "http://localhost:8080/objects/topics/abc/1.png");
        assert_eq!(image.key, "topics/abc/1.png");
        let written = std::fs::read(temp.path().join("topics/abc/1.png")).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn store_bytes_leaves_no_temp_file() {
        let (storage, temp) = create_storage();
        storage.store_bytes("a.png", b"x").await.unwrap();
        assert!(!temp.path().join("a.png.tmp").exists());
    }

    #[tokio::test]
    async fn store_bytes_overwrites_existing() {
        let (storage, temp) = create_storage();
        storage.store_bytes("a.png", b"old").await.unwrap();
        storage.store_bytes("a.png", b"new").await.unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.png")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn keys_escaping_root_are_rejected() {
        let (storage, _temp) = create_storage();
        for key in ["", "../etc/passwd", "/abs.png", "topics/../../x.png"] {
            let err = storage.store_bytes(key, b"x").await.unwrap_err();
            assert!(matches!(err, ObjectStorageError::InvalidKey(_)), "key {:?}", key);
        }
    }

    #[tokio::test]
    async fn upload_rejects_bad_key_before_downloading() {
        let (storage, _temp) = create_storage();
        let err = storage
            .upload_from_url("http://127.0.0.1:9/never", "../x.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ObjectStorageError::InvalidKey(_)));
    }
}
