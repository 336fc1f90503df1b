use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Mutex, MutexGuard, PoisonError, RwLock},
};

use tracing::{debug, error, warn};

use super::{
    AccessMask, DispatchLimits, ErrorHandler, ListenerEntry, ListenerFailure, ListenerRegistry,
    PanicHandler, ParameterKey, ParameterListener, ParameterValue, Parameters,
    dispatch::DispatchFrames,
    escalation::{default_error_handler, default_panic_handler, panic_message},
    registry::Removal,
};
use crate::{BusError, Result, config::BusSettings};

/// A synchronous reactive configuration store.
///
/// Holds the parameter table and the listeners observing it. Every read
/// fires the key's READ listeners and every write fires its WRITE listeners,
/// on the calling thread, before the operation returns. Listeners may read
/// and write other parameters from inside their callback.
///
/// Each public operation runs inside a boundary that catches panics and
/// routes every failure through the panic handler; by default failures are
/// returned to the caller.
pub struct ConfigBus<K, V> {
    pub(super) parameters: RwLock<Parameters<K, V>>,
    pub(super) listeners: Mutex<ListenerRegistry<K, V>>,
    pub(super) frames: DispatchFrames<K>,
    pub(super) error_handler: RwLock<ErrorHandler<K>>,
    pub(super) panic_handler: RwLock<PanicHandler>,
}

impl<K: ParameterKey, V: ParameterValue> ConfigBus<K, V> {
    /// Creates an empty bus with default dispatch limits and handlers.
    pub fn new() -> Self {
        Self::with_limits(DispatchLimits::default())
    }

    /// Creates an empty bus using the dispatch section of `settings`.
    pub fn with_settings(settings: &BusSettings) -> Self {
        Self::with_limits(settings.dispatch.limits())
    }

    /// Creates an empty bus with explicit dispatch limits.
    ///
    /// A `max_depth` of 0 is raised to 1 so that top-level dispatch always
    /// runs.
    pub fn with_limits(limits: DispatchLimits) -> Self {
        let limits = DispatchLimits {
            max_depth: limits.max_depth.max(1),
            ..limits
        };

        Self {
            parameters: RwLock::new(Parameters::new()),
            listeners: Mutex::new(ListenerRegistry::new()),
            frames: DispatchFrames::new(limits),
            error_handler: RwLock::new(default_error_handler()),
            panic_handler: RwLock::new(default_panic_handler()),
        }
    }

    /// Dispatch limits this bus was built with.
    pub fn limits(&self) -> DispatchLimits {
        self.frames.limits()
    }

    /// Registers `listener` for `access` on `key`.
    ///
    /// Registering the same listener again on the same key merges the masks
    /// instead of adding a second entry.
    ///
    /// # Errors
    /// * `BusError::ReentrancyViolation` - If called from inside a running listener
    /// * `BusError::InvalidArgument` - If `access` is empty
    pub fn add_parameter_listener(
        &self,
        key: K,
        access: AccessMask,
        listener: &ParameterListener<V>,
    ) -> Result<()> {
        self.guarded("add_parameter_listener", || {
            self.check_not_dispatching("add", &key)?;

            let effective = self.registry().add(key.clone(), access, listener)?;
            debug!(key = %key, listener = %listener.id(), access = %effective, "registered parameter listener");

            Ok(())
        })
    }

    /// Clears `access` from `listener`'s registration on `key`, dropping the
    /// registration once it listens for nothing. Does nothing if the listener
    /// is not registered on `key`.
    ///
    /// # Errors
    /// * `BusError::ReentrancyViolation` - If called from inside a running listener
    pub fn remove_parameter_listener(
        &self,
        key: &K,
        access: AccessMask,
        listener: &ParameterListener<V>,
    ) -> Result<()> {
        self.guarded("remove_parameter_listener", || {
            self.check_not_dispatching("remove", key)?;

            match self.registry().remove(key, access, listener.id()) {
                Removal::NotFound => {}
                Removal::Narrowed { remaining } => {
                    debug!(key = %key, listener = %listener.id(), access = %remaining, "narrowed parameter listener");
                }
                Removal::Pruned => {
                    debug!(key = %key, listener = %listener.id(), "removed parameter listener");
                }
            }

            Ok(())
        })
    }

    /// Returns a copy of the listener entries registered on `key`, in
    /// invocation order. Allowed from inside a running listener.
    ///
    /// # Errors
    /// Only fails if the lookup panics and the panic handler escalates it.
    pub fn get_parameter_listeners(&self, key: &K) -> Result<Vec<ListenerEntry<V>>> {
        self.guarded("get_parameter_listeners", || {
            Ok(self.registry().listeners_for(key))
        })
    }

    /// Installs a new listener error handler and returns the previous one.
    ///
    /// Takes effect for every later escalation, including ones inside
    /// dispatches already in flight.
    pub fn set_error_handler<F>(&self, handler: F) -> ErrorHandler<K>
    where
        F: Fn(ListenerFailure<K>) -> Result<()> + Send + Sync + 'static,
    {
        let mut slot = self
            .error_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, std::sync::Arc::new(handler))
    }

    /// Installs a new boundary failure handler and returns the previous one.
    pub fn set_panic_handler<F>(&self, handler: F) -> PanicHandler
    where
        F: Fn(BusError) -> Result<()> + Send + Sync + 'static,
    {
        let mut slot = self
            .panic_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, std::sync::Arc::new(handler))
    }

    /// Looks up `key`, firing its READ listeners with the current value.
    ///
    /// # Errors
    /// Returns any failure raised by a listener or the dispatch guards, after
    /// it passes through the panic handler.
    pub fn get_parameter(&self, key: &K) -> Result<Option<V>> {
        self.guarded("get_parameter", || {
            let value = self.table().get(key).cloned();
            self.dispatch(key, AccessMask::READ, value.as_ref())?;
            Ok(value)
        })
    }

    /// Returns a snapshot of every parameter, firing READ listeners for each
    /// key in it. Keys are dispatched in no particular order.
    ///
    /// # Errors
    /// Returns any failure raised while dispatching, after it passes through
    /// the panic handler.
    pub fn get_parameters(&self) -> Result<Parameters<K, V>> {
        self.guarded("get_parameters", || {
            let snapshot = self.table().clone();
            for (key, value) in &snapshot {
                self.dispatch(key, AccessMask::READ, Some(value))?;
            }
            Ok(snapshot)
        })
    }

    /// Stores `value` under `key`, then fires WRITE listeners with the value
    /// that was there before (`None` if the key was absent).
    ///
    /// The write stays committed even if a listener fails.
    ///
    /// # Errors
    /// Returns any failure raised while dispatching, after it passes through
    /// the panic handler.
    pub fn set_parameter(&self, key: K, value: V) -> Result<()> {
        self.guarded("set_parameter", || self.commit(key, value))
    }

    /// Applies every pair in `parameters`, committing and dispatching each one
    /// in turn exactly as [`ConfigBus::set_parameter`] does.
    ///
    /// Stops at the first failure; pairs already applied stay committed.
    ///
    /// # Errors
    /// Returns any failure raised while dispatching, after it passes through
    /// the panic handler.
    pub fn set_parameters<I>(&self, parameters: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.guarded("set_parameters", || {
            for (key, value) in parameters {
                self.commit(key, value)?;
            }
            Ok(())
        })
    }

    /// Removes `key`, firing WRITE listeners with the removed value. Absent
    /// keys return `None` without dispatching.
    ///
    /// # Errors
    /// Returns any failure raised while dispatching, after it passes through
    /// the panic handler.
    pub fn remove_parameter(&self, key: &K) -> Result<Option<V>> {
        self.guarded("remove_parameter", || {
            let removed = self.table_mut().remove(key);
            if let Some(value) = &removed {
                self.dispatch(key, AccessMask::WRITE, Some(value))?;
            }
            Ok(removed)
        })
    }

    /// Number of parameters currently stored. Does not fire listeners.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// Returns true when no parameters are stored. Does not fire listeners.
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn commit(&self, key: K, value: V) -> Result<()> {
        let previous = self.table_mut().insert(key.clone(), value);
        self.dispatch(&key, AccessMask::WRITE, previous.as_ref())
    }

    fn check_not_dispatching(&self, operation: &'static str, key: &K) -> Result<()> {
        if self.frames.active().is_some() {
            return Err(BusError::ReentrancyViolation {
                operation,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Runs `body` inside the operation boundary.
    ///
    /// Panics are caught and converted to `BusError::Panicked`; any failure
    /// is then handed to the panic handler. A swallowed failure yields the
    /// operation's empty result.
    fn guarded<T, F>(&self, operation: &'static str, body: F) -> Result<T>
    where
        T: Default,
        F: FnOnce() -> Result<T>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!(operation, %message, "caught panic at operation boundary");
            Err(BusError::Panicked { operation, message })
        });

        let failure = match outcome {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        warn!(operation, error = %failure, "operation failed");
        let handler = self.panic_handler();
        handler(failure)?;

        debug!(operation, "panic handler swallowed failure");
        Ok(T::default())
    }

    pub(super) fn registry(&self) -> MutexGuard<'_, ListenerRegistry<K, V>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn error_handler(&self) -> ErrorHandler<K> {
        self.error_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn panic_handler(&self) -> PanicHandler {
        self.panic_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn table(&self) -> std::sync::RwLockReadGuard<'_, Parameters<K, V>> {
        self.parameters.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn table_mut(&self) -> std::sync::RwLockWriteGuard<'_, Parameters<K, V>> {
        self.parameters.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: ParameterKey, V: ParameterValue> Default for ConfigBus<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ParameterKey, V: ParameterValue> fmt::Debug for ConfigBus<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBus")
            .field("parameters", &self.len())
            .field("listened_keys", &self.registry().key_count())
            .field("limits", &self.limits())
            .finish()
    }
}
