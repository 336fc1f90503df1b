use std::{collections::HashMap, fmt::Display, hash::Hash};

/// Capability set required of parameter keys.
///
/// Keys are looked up by identity (`Eq + Hash`) and rendered with `Display`
/// in log records and error messages. Implemented for every type that
/// satisfies the bounds.
pub trait ParameterKey: Eq + Hash + Clone + Display + Send + Sync + 'static {}

impl<T> ParameterKey for T where T: Eq + Hash + Clone + Display + Send + Sync + 'static {}

/// Capability set required of parameter values.
///
/// Values are opaque to the bus; `Display` is only used for diagnostics.
pub trait ParameterValue: Clone + Display + Send + Sync + 'static {}

impl<T> ParameterValue for T where T: Clone + Display + Send + Sync + 'static {}

/// Snapshot of the parameter table.
pub type Parameters<K, V> = HashMap<K, V>;
