//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.preview_photos == 0 {
            return Err(ConfigError::ValidationError(
                "library.preview_photos must be > 0".into(),
            ));
        }
        if self.pool.workers == 0 {
            return Err(ConfigError::ValidationError(
                "pool.workers must be > 0".into(),
            ));
        }
        if self.pool.queue_size == 0 {
            return Err(ConfigError::ValidationError(
                "pool.queue_size must be > 0".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}
