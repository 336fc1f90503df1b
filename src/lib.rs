//! figura - reactive in-process configuration store.
//!
//! A key-value table whose reads and writes are observed by registered
//! listeners, filtered by access type:
//!
//! - Synchronous dispatch on the calling thread, in registration order
//! - Self-recursion, reentrancy, cycle and depth guards
//! - Replaceable handlers for listener errors and unexpected panics
//! - Settings loaded from TOML
//!
//! # Quick Start
//!
//! ```rust
//! use figura::config_bus::{AccessMask, ConfigBus, ParameterListener};
//!
//! let bus: ConfigBus<String, u32> = ConfigBus::new();
//! let listener = ParameterListener::new(|previous: Option<&u32>, access| {
//!     println!("{access} access, previous value {previous:?}");
//!     Ok(())
//! });
//!
//! bus.add_parameter_listener("retries".to_string(), AccessMask::WRITE, &listener)?;
//! bus.set_parameter("retries".to_string(), 3)?;
//! assert_eq!(bus.get_parameter(&"retries".to_string())?, Some(3));
//! # Ok::<(), figura::BusError>(())
//! ```

/// Bus settings and their on-disk location.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// The reactive configuration bus.
pub mod config_bus;

/// Command-line interface for the `figura` binary.
pub mod cli;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{BusError, ListenerError, Result};
