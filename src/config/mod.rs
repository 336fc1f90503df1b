//! Bus settings and their on-disk location.
//!
//! Settings are read from TOML. Every field has a default, so an empty or
//! missing file yields a working bus.

mod dispatch;
mod general;
mod loading;
mod paths;

#[cfg(test)]
mod tests;

pub use dispatch::DispatchSettings;
pub use general::{GeneralSettings, LogLevel};
pub use paths::ConfigPaths;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete settings for a configuration bus and the tooling around it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct BusSettings {
    /// General settings.
    #[serde(default)]
    pub general: GeneralSettings,

    /// Guards applied to nested listener dispatch.
    #[serde(default)]
    pub dispatch: DispatchSettings,
}
