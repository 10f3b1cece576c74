//! Shell configuration
//!
//! This module re-exports the shared `ShellConfig` from sorteo-types and
//! provides confy-backed persistence for it.

use std::path::{Path, PathBuf};

pub use sorteo_types::ShellConfig;

use super::error::ConfigError;

const APP_NAME: &str = "sorteo";
const CONFIG_NAME: &str = "config";

/// Extension trait for ShellConfig persistence
pub trait ShellConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn load_with_defaults() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn try_load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl ShellConfigExt for ShellConfig {
    /// Load the stored config, falling back to defaults on any failure.
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "Using default configuration");
                Self::load_with_defaults()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn load_with_defaults() -> Self {
        ShellConfig::default()
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)?;
        tracing::debug!("Configuration saved");
        Ok(())
    }

    /// Load from an explicit file; a missing file is created with defaults.
    fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)?;
        tracing::debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::ConfigPath)
    }
}
