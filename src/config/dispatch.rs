use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config_bus::DispatchLimits;

/// Guards applied while listeners trigger further bus operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DispatchSettings {
    /// Fail with a cycle error when a key whose dispatch is still running
    /// would invoke a listener again.
    #[serde(default = "default_cycle_detection")]
    pub cycle_detection: bool,

    /// Maximum number of nested dispatches on one thread. Must be at least 1.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_cycle_detection() -> bool {
    DispatchLimits::default().cycle_detection
}

fn default_max_depth() -> usize {
    DispatchLimits::default().max_depth
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            cycle_detection: default_cycle_detection(),
            max_depth: default_max_depth(),
        }
    }
}

impl DispatchSettings {
    /// Converts these settings into the limits a bus enforces.
    pub fn limits(&self) -> DispatchLimits {
        DispatchLimits {
            cycle_detection: self.cycle_detection,
            max_depth: self.max_depth,
        }
    }
}
