//! # Form Store Configuration
//!
//! Layered configuration for the dispatch core: built-in defaults, optional
//! TOML files and `FORMSTORE__*` environment overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use formstore_core::config::ConfigManager;
//! use formstore_core::ui::FormBuilder;
//!
//! # fn main() -> formstore_core::Result<()> {
//! let manager = ConfigManager::load()?;
//! let form = FormBuilder::with_config(&manager.config().forms).build()?;
//! # let _ = form;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::DEFAULT_FORM_TIMEOUT;
use crate::error::{FormError, Result};

pub use loader::ConfigManager;

/// Root configuration structure mirroring formstore.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormStoreConfig {
    /// Defaults applied to forms built from configuration
    pub forms: FormsConfig,

    /// Subscriber settings for [`crate::logging::init_structured_logging`]
    pub logging: LoggingConfig,
}

impl FormStoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.forms.default_timeout_ms == Some(0) {
            return Err(FormError::Configuration(
                "forms.default_timeout_ms must be positive; omit it to disable timeouts"
                    .to_string(),
            ));
        }
        if self.forms.task_label_prefix.trim().is_empty() {
            return Err(FormError::Configuration(
                "forms.task_label_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Inactivity timeout in milliseconds; `None` means forms never expire.
    pub default_timeout_ms: Option<u64>,

    /// Set to `false` to build forms without a timeout regardless of
    /// `default_timeout_ms`
    pub timeouts_enabled: bool,

    /// Prefix for scheduled task and timer labels
    pub task_label_prefix: String,
}

impl FormsConfig {
    pub fn default_timeout(&self) -> Option<Duration> {
        if !self.timeouts_enabled {
            return None;
        }
        self.default_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: Some(DEFAULT_FORM_TIMEOUT.as_millis() as u64),
            timeouts_enabled: true,
            task_label_prefix: "formstore".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; falls back to `RUST_LOG`, then the environment default.
    pub level: Option<String>,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
