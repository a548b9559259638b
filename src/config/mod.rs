//! Typed settings read from the process environment.
//!
//! Variables use the `DRAWING_COMPANION` prefix and `__` between nesting
//! levels, so `DRAWING_COMPANION__EXPLORATION__SAMPLE_SIZE=2` sets
//! `exploration.sample_size`. A `.env` file is honoured in development.
//!
//! ```no_run
//! use drawing_companion::config::AppConfig;
//!
//! let config = AppConfig::load().expect("settings should parse");
//! config.validate().expect("settings should be usable");
//! ```

mod ai;
mod error;
mod exploration;
mod server;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use exploration::{ExplorationConfig, MetadataMode, MAX_SAMPLE_SIZE};
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

const ENV_PREFIX: &str = "DRAWING_COMPANION";

use serde::Deserialize;

/// All settings. Every section has defaults; the OpenAI key is the only
/// value [`AppConfig::validate`] insists on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the prefixed environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::Load` when a value does not parse into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        self.exploration.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const KEY: &str = "DRAWING_COMPANION__AI__OPENAI_API_KEY";
    const VARS: [&str; 6] = [
        KEY,
        "DRAWING_COMPANION__SERVER__BIND",
        "DRAWING_COMPANION__SERVER__ENVIRONMENT",
        "DRAWING_COMPANION__EXPLORATION__METADATA_MODE",
        "DRAWING_COMPANION__EXPLORATION__SAMPLE_SIZE",
        "DRAWING_COMPANION__STORAGE__ROOT_DIR",
    ];

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        for var in VARS {
            env::remove_var(var);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        let result = AppConfig::load();
        for var in VARS {
            env::remove_var(var);
        }
        result
    }

    #[test]
    fn key_alone_is_a_valid_configuration() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[(KEY, "sk-test")]).unwrap();

        assert!(config.ai.has_openai());
        assert!(config.validate().is_ok());
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.exploration.metadata_mode, MetadataMode::Background);
    }

    #[test]
    fn missing_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn nested_sections_are_overridden() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            (KEY, "sk-test"),
            ("DRAWING_COMPANION__SERVER__BIND", "127.0.0.1:3000"),
            ("DRAWING_COMPANION__SERVER__ENVIRONMENT", "production"),
            ("DRAWING_COMPANION__EXPLORATION__METADATA_MODE", "eager"),
            ("DRAWING_COMPANION__EXPLORATION__SAMPLE_SIZE", "2"),
            ("DRAWING_COMPANION__STORAGE__ROOT_DIR", "/var/lib/drawing"),
        ])
        .unwrap();

        assert_eq!(config.server.socket_addr().unwrap().port(), 3000);
        assert!(config.is_production());
        assert_eq!(config.exploration.metadata_mode, MetadataMode::Eager);
        assert_eq!(config.exploration.sample_size, 2);
        assert_eq!(config.storage.root_dir.to_str(), Some("/var/lib/drawing"));
    }

    #[test]
    fn unparsable_number_is_a_load_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = load_with(&[(KEY, "sk-test"), ("DRAWING_COMPANION__EXPLORATION__SAMPLE_SIZE", "three")]);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
