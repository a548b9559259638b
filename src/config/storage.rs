//! Object storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Where reference images are kept and how they are served
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory objects are written under
    #[serde(default = "default_root")]
    pub root_dir: PathBuf,

    /// URL prefix objects are served from
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Timeout for downloading a generated image, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl StorageConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__ROOT_DIR"));
        }
        if !self.public_base_url.starts_with("http://") && !self.public_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                field: "storage.public_base_url",
                value: self.public_base_url.clone(),
            });
        }
        if self.download_timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("storage.download_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root(),
            public_base_url: default_public_base_url(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./data/objects")
}

fn default_public_base_url() -> String {
    "http://localhost:8080/objects".to_string()
}

fn default_download_timeout() -> u64 {
    30
}
