//! Reactive in-process configuration bus.
//!
//! A key-value table whose reads and writes are observed by registered
//! listeners, filtered by access type. Dispatch is synchronous: listeners
//! run on the calling thread before the triggering operation returns.

mod access;
mod bus;
mod dispatch;
mod environment;
mod escalation;
mod listener;
mod parameter;
mod registry;

#[cfg(test)]
mod tests;

pub use access::AccessMask;
pub use bus::ConfigBus;
pub use dispatch::DispatchLimits;
pub use environment::{
    Environment, NamedEnvironment, new_synchronous_config, new_synchronous_config_with,
};
pub use escalation::{
    ErrorHandler, ListenerFailure, PanicHandler, default_error_handler, default_panic_handler,
};
pub use listener::{ListenerEntry, ListenerFn, ListenerId, ParameterListener};
pub use parameter::{ParameterKey, ParameterValue, Parameters};
pub use registry::{ListenerRegistry, Removal};
