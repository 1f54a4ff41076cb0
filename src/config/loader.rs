//! Configuration Loader
//!
//! Environment-aware loading: `formstore.toml`, then `formstore.<env>.toml`,
//! then `FORMSTORE__SECTION__KEY` environment variables. Missing files are
//! skipped; every layer overrides the one before it.

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::FormStoreConfig;
use crate::error::Result;

const BASE_FILE_STEM: &str = "formstore";
const ENV_PREFIX: &str = "FORMSTORE";

pub struct ConfigManager {
    config: FormStoreConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> Result<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> Result<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Lets tests pick an environment without touching process variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> Result<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading form store configuration"
        );

        let config = Self::build_layers(&config_directory, environment)?
            .try_deserialize::<FormStoreConfig>()?;
        config.validate()?;

        debug!(
            environment = %environment,
            default_timeout_ms = ?config.forms.default_timeout_ms,
            timeouts_enabled = config.forms.timeouts_enabled,
            "✅ Configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    fn build_layers(directory: &Path, environment: &str) -> Result<Config> {
        let base = directory.join(format!("{BASE_FILE_STEM}.toml"));
        let overlay = directory.join(format!("{BASE_FILE_STEM}.{environment}.toml"));

        let config = Config::builder()
            .add_source(File::from(base).required(false))
            .add_source(File::from(overlay).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config)
    }

    pub fn config(&self) -> &FormStoreConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// `FORMSTORE_ENV`, then `APP_ENV`, lowercased; `development` otherwise.
    pub fn detect_environment() -> String {
        env::var("FORMSTORE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("environment", &self.environment)
            .field("config_directory", &self.config_directory)
            .finish()
    }
}
