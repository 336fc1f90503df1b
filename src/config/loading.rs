use std::{fs, path::Path};

use tracing::{debug, info};

use super::{BusSettings, ConfigPaths};
use crate::{BusError, Result};

impl BusSettings {
    /// Loads settings from the TOML file at `path`.
    ///
    /// # Errors
    /// * `BusError::Io` - If the file cannot be read
    /// * `BusError::Settings` - If the file is not valid settings TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content, Some(path))?;
        info!(path = %path.display(), "loaded bus settings");
        Ok(settings)
    }

    /// Loads settings from the default location, falling back to defaults
    /// when no settings file exists there.
    ///
    /// # Errors
    /// * `BusError::Io` - If the settings directory cannot be determined or the file cannot be read
    /// * `BusError::Settings` - If the file is not valid settings TOML
    pub fn load_default() -> Result<Self> {
        let path = ConfigPaths::settings_file()?;
        if !path.exists() {
            debug!(path = %path.display(), "no settings file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    /// * `BusError::Settings` - If the string is not valid settings TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self> {
        let settings: BusSettings =
            toml::from_str(content).map_err(|e| BusError::settings(e, path))?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: Option<&Path>) -> Result<()> {
        if self.dispatch.max_depth == 0 {
            return Err(BusError::settings(
                "dispatch.max_depth must be at least 1",
                path,
            ));
        }
        Ok(())
    }
}
