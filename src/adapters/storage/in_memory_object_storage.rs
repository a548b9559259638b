//! In-memory object storage for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::drawing::ImageRef;
use crate::ports::{ObjectStorage, ObjectStorageError};

/// Records uploads without fetching anything.
///
/// Stores the source URL under each key so tests can check what was copied.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStorage {
    public_base_url: String,
    objects: Arc<RwLock<HashMap<String, String>>>,
    fail_uploads: bool,
}

impl InMemoryObjectStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(RwLock::new(HashMap::new())),
            fail_uploads: false,
        }
    }

    /// Makes every upload fail with a download error.
    pub fn failing(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// The source URL stored under `key`.
    pub async fn source_of(&self, key: &str) -> Option<String> {
        self.objects.read().await.get(key).cloned()
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("http://localhost/objects")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload_from_url(&self, source_url: &str, key: &str) -> Result<ImageRef, ObjectStorageError> {
        if self.fail_uploads {
            return Err(ObjectStorageError::Download(format!("refusing {}", source_url)));
        }
        if key.trim().is_empty() {
            return Err(ObjectStorageError::InvalidKey(key.to_string()));
        }
        self.objects
            .write()
            .await
            .insert(key.to_string(), source_url.to_string());
        Ok(ImageRef {
            url: format!("{}/{}", self.public_base_url, key),
            key: key.to_string(),
        })
    }
}
