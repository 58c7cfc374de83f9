//! Configuration for the wizard host.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::image::DEFAULT_MAX_IMAGE_BYTES;
use event_wizard_runtime::StoreConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting has an unusable value
    #[error("Invalid {name}: {reason}")]
    Invalid {
        /// Environment variable name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Wizard configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Quiet period before an edit is autosaved (`WIZARD_AUTOSAVE_MS`)
    pub autosave_interval: Duration,
    /// File backing the draft slot (`WIZARD_DRAFT_PATH`)
    pub draft_path: PathBuf,
    /// Largest accepted cover image in bytes (`WIZARD_MAX_IMAGE_BYTES`)
    pub max_image_bytes: u64,
    /// How long teardown waits for in-flight effects (`WIZARD_SHUTDOWN_TIMEOUT_MS`)
    pub shutdown_timeout: Duration,
    /// Log filter (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            autosave_interval: Duration::from_millis(1000),
            draft_path: PathBuf::from(".event-wizard/draft.json"),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            shutdown_timeout: Duration::from_millis(5000),
            log_filter: "event_wizard=info".to_string(),
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            autosave_interval: env::var("WIZARD_AUTOSAVE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.autosave_interval, Duration::from_millis),
            draft_path: env::var("WIZARD_DRAFT_PATH")
                .map_or(defaults.draft_path, PathBuf::from),
            max_image_bytes: env::var("WIZARD_MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_image_bytes),
            shutdown_timeout: env::var("WIZARD_SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_millis),
            log_filter: env::var("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Check that the values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero autosave interval, a zero
    /// image limit, or an empty draft path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_interval.is_zero() {
            return Err(ConfigError::Invalid {
                name: "WIZARD_AUTOSAVE_MS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "WIZARD_MAX_IMAGE_BYTES",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.draft_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                name: "WIZARD_DRAFT_PATH",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Set the autosave quiet period
    #[must_use]
    pub const fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// Set the draft file
    #[must_use]
    pub fn with_draft_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.draft_path = path.into();
        self
    }

    /// Set the cover image size limit
    #[must_use]
    pub const fn with_max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    /// Set the teardown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_shutdown_timeout(self.shutdown_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WizardConfig::default();
        assert_eq!(config.autosave_interval, Duration::from_secs(1));
        assert_eq!(config.draft_path, PathBuf::from(".event-wizard/draft.json"));
        assert_eq!(config.max_image_bytes, 5_242_880);
        assert_eq!(config.store_config().shutdown_timeout, Duration::from_secs(5));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builders_override() {
        let config = WizardConfig::default()
            .with_autosave_interval(Duration::from_millis(50))
            .with_draft_path("/tmp/draft.json")
            .with_max_image_bytes(1024);
        assert_eq!(config.autosave_interval, Duration::from_millis(50));
        assert_eq!(config.draft_path, PathBuf::from("/tmp/draft.json"));
        assert_eq!(config.max_image_bytes, 1024);
    }

    #[test]
    fn validate_rejects_zero_values() {
        let config = WizardConfig::default().with_autosave_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                name: "WIZARD_AUTOSAVE_MS",
                ..
            })
        ));
        assert!(WizardConfig::default().with_max_image_bytes(0).validate().is_err());
        assert!(WizardConfig::default().with_draft_path("").validate().is_err());
    }
}
