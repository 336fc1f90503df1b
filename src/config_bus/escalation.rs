use std::{any::Any, fmt, sync::Arc};

use super::{AccessMask, ListenerId, ParameterKey};
use crate::{BusError, Result, core::ListenerError};

/// A listener error on its way to the error handler.
pub struct ListenerFailure<K> {
    /// Listener that returned the error
    pub listener: ListenerId,
    /// Access that triggered the listener
    pub access: AccessMask,
    /// Key being accessed
    pub key: K,
    /// Error returned by the listener
    pub error: ListenerError,
}

impl<K: ParameterKey> ListenerFailure<K> {
    /// Converts the failure into the error the bus reports to its caller.
    pub fn escalate(self) -> BusError {
        BusError::Listener {
            listener: self.listener,
            access: self.access,
            key: self.key.to_string(),
            source: self.error,
        }
    }
}

impl<K: fmt::Display> fmt::Debug for ListenerFailure<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFailure")
            .field("listener", &self.listener)
            .field("access", &self.access)
            .field("key", &self.key.to_string())
            .field("error", &self.error.to_string())
            .finish()
    }
}

/// Decides what happens when a listener returns an error.
///
/// Returning `Ok(())` lets dispatch continue with the next listener;
/// returning `Err` aborts the dispatch and hands the error to the panic
/// handler at the operation boundary.
pub type ErrorHandler<K> = Arc<dyn Fn(ListenerFailure<K>) -> Result<()> + Send + Sync>;

/// Decides what happens to a failure that reaches an operation boundary,
/// whether it was returned or caught as a panic.
///
/// Returning `Err` reports it to the caller; returning `Ok(())` swallows it
/// and the operation yields its empty result.
pub type PanicHandler = Arc<dyn Fn(BusError) -> Result<()> + Send + Sync>;

/// Escalates every listener error.
pub fn default_error_handler<K: ParameterKey>() -> ErrorHandler<K> {
    Arc::new(|failure: ListenerFailure<K>| -> Result<()> { Err(failure.escalate()) })
}

/// Reports every failure to the caller unchanged.
pub fn default_panic_handler() -> PanicHandler {
    Arc::new(|failure: BusError| -> Result<()> { Err(failure) })
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(error) = payload.downcast_ref::<BusError>() {
        error.to_string()
    } else {
        "non-string panic payload".to_string()
    }
}
