use std::{
    error::Error as StdError,
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::config_bus::{AccessMask, ListenerId};

/// Boxed error returned by a parameter listener.
///
/// Listeners may bubble up any error type with `?`, including a [`BusError`]
/// produced by a nested bus operation.
pub type ListenerError = Box<dyn StdError + Send + Sync + 'static>;

/// Error types for the configuration bus.
///
/// Every public bus operation reports its failures through this enum, either
/// directly or after routing them through the installed panic handler.
#[derive(Error, Debug)]
pub enum BusError {
    /// A listener tried to change the listener registry while a dispatch was in flight.
    #[error("cannot {operation} a listener on [{key}] while a dispatch is in progress")]
    ReentrancyViolation {
        /// Registry operation that was rejected ("add" or "remove")
        operation: &'static str,
        /// String form of the key the operation targeted
        key: String,
    },

    /// A listener returned an error and the error handler escalated it.
    #[error("listener {listener} failed on {access} access of [{key}]: {source}")]
    Listener {
        /// Identity of the failing listener
        listener: ListenerId,
        /// Access that triggered the listener
        access: AccessMask,
        /// String form of the accessed key
        key: String,
        /// Error returned by the listener
        #[source]
        source: ListenerError,
    },

    /// A panic was caught at the boundary of a public operation.
    #[error("unexpected panic in {operation}: {message}")]
    Panicked {
        /// Public operation that was running
        operation: &'static str,
        /// Panic payload rendered as text
        message: String,
    },

    /// A key re-entered dispatch for the same access type while that
    /// dispatch was still running.
    #[error("listener cycle detected on [{key}]: {chain}")]
    CycleDetected {
        /// Key that re-entered dispatch
        key: String,
        /// Keys currently being dispatched, outermost first
        chain: String,
    },

    /// Nested dispatches went deeper than the configured ceiling.
    #[error("dispatch depth {depth} on [{key}] exceeds limit of {limit}")]
    DepthExceeded {
        /// Key whose dispatch hit the ceiling
        key: String,
        /// Depth that would have been reached
        depth: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// A caller passed an argument the bus cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings file could not be parsed or validated.
    #[error("invalid settings in '{path}': {details}")]
    Settings {
        /// Location of the settings (file path or "string")
        path: PathBuf,
        /// Parse or validation error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

impl BusError {
    /// Creates a settings error with optional file path context.
    pub fn settings(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                BusError::Settings {
                    path: clean_path,
                    details: error.to_string(),
                }
            }
            None => BusError::Settings {
                path: PathBuf::from("string"),
                details: error.to_string(),
            },
        }
    }

    /// Walks the source chain of this error looking for a nested [`BusError`]
    /// that matches `predicate`, starting with `self`.
    ///
    /// Failures raised by nested bus operations reach the caller wrapped in
    /// one or more [`BusError::Listener`] layers; this finds the root cause.
    pub fn find_cause(&self, predicate: impl Fn(&BusError) -> bool) -> Option<&BusError> {
        if predicate(self) {
            return Some(self);
        }

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            if let Some(bus_err) = err.downcast_ref::<BusError>() {
                if predicate(bus_err) {
                    return Some(bus_err);
                }
            }
            current = err.source();
        }

        None
    }
}
