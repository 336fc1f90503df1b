use std::{fmt, sync::Arc};

use tracing::info;

use super::{ConfigBus, ParameterKey, ParameterValue};
use crate::config::BusSettings;

/// A named context that owns one configuration bus.
pub trait Environment<K, V> {
    /// Binds `bus` to this environment, replacing any previous binding.
    fn set_config(&mut self, bus: Arc<ConfigBus<K, V>>);

    /// The bus bound to this environment, if any.
    fn config(&self) -> Option<Arc<ConfigBus<K, V>>>;

    /// Display name used in diagnostics.
    fn name(&self) -> &str;
}

/// Minimal [`Environment`] holding a name and its bus.
pub struct NamedEnvironment<K, V> {
    name: String,
    config: Option<Arc<ConfigBus<K, V>>>,
}

impl<K, V> NamedEnvironment<K, V> {
    /// Creates an environment with no bus bound yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    /// Returns true once a bus has been bound.
    pub fn is_live(&self) -> bool {
        self.config.is_some()
    }
}

impl<K, V> Environment<K, V> for NamedEnvironment<K, V> {
    fn set_config(&mut self, bus: Arc<ConfigBus<K, V>>) {
        self.config = Some(bus);
    }

    fn config(&self) -> Option<Arc<ConfigBus<K, V>>> {
        self.config.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<K, V> fmt::Display for NamedEnvironment<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<K, V> fmt::Debug for NamedEnvironment<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedEnvironment")
            .field("name", &self.name)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Creates a synchronous bus with default settings and binds it to `env`.
///
/// Returns a handle to the same bus the environment now holds.
pub fn new_synchronous_config<K, V, E>(env: &mut E) -> Arc<ConfigBus<K, V>>
where
    K: ParameterKey,
    V: ParameterValue,
    E: Environment<K, V>,
{
    new_synchronous_config_with(env, &BusSettings::default())
}

/// Creates a synchronous bus configured by `settings` and binds it to `env`.
pub fn new_synchronous_config_with<K, V, E>(env: &mut E, settings: &BusSettings) -> Arc<ConfigBus<K, V>>
where
    K: ParameterKey,
    V: ParameterValue,
    E: Environment<K, V>,
{
    let bus = Arc::new(ConfigBus::with_settings(settings));
    env.set_config(Arc::clone(&bus));
    info!(environment = env.name(), limits = ?bus.limits(), "bound configuration bus");
    bus
}
