//! Application configuration.

use serde::{Deserialize, Serialize};

use crate::options::{OptionsError, UploadOptions};
use crate::progress::{ProgressSchedule, ScheduleError};

/// Default endpoint of the result provider, relative to the page origin.
pub const DEFAULT_ENDPOINT: &str = "/api/result";

/// Errors loading an [`AppConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Upload options are invalid.
    #[error("invalid upload options: {0}")]
    Upload(#[from] OptionsError),

    /// Progress schedule is invalid.
    #[error("invalid progress schedule: {0}")]
    Simulation(#[from] ScheduleError),

    /// Endpoint is blank.
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
}

/// Everything the page needs to mount the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Drop surface options.
    pub upload: UploadOptions,
    /// Progress simulation timing.
    pub simulation: ProgressSchedule,
    /// URL the result provider posts to.
    pub endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload: UploadOptions::default(),
            simulation: ProgressSchedule::default(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, unknown keys, or
    /// invalid values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first invalid section as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upload.validate()?;
        self.simulation.validate()?;
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(())
    }
}
