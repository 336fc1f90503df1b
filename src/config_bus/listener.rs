use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use super::AccessMask;
use crate::core::ListenerError;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a parameter listener.
///
/// Assigned once when a [`ParameterListener`] is created and shared by all
/// of its clones. Registry merges and removals match on this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closure type for parameter listeners.
///
/// Receives the value visible before the access (`None` if the key was
/// absent) and the access type that fired.
pub type ListenerFn<V> = dyn Fn(Option<&V>, AccessMask) -> Result<(), ListenerError> + Send + Sync;

/// A cloneable handle to a listener callback.
///
/// Register the same handle (or a clone of it) to merge access masks; pass
/// it again to remove it.
pub struct ParameterListener<V> {
    id: ListenerId,
    callback: Arc<ListenerFn<V>>,
}

impl<V> ParameterListener<V> {
    /// Wrap `callback` and assign it a fresh identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Option<&V>, AccessMask) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::next(),
            callback: Arc::new(callback),
        }
    }

    /// Identity of this listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the callback.
    ///
    /// # Errors
    /// Returns whatever error the callback returns.
    pub fn call(&self, previous: Option<&V>, access: AccessMask) -> Result<(), ListenerError> {
        (self.callback)(previous, access)
    }
}

impl<V> Clone for ParameterListener<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<V> fmt::Debug for ParameterListener<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterListener")
            .field("id", &self.id)
            .finish()
    }
}

/// A registered (mask, listener) pair for one key.
pub struct ListenerEntry<V> {
    /// Access types this entry listens for. Never empty while registered.
    pub access: AccessMask,
    /// The registered listener.
    pub listener: ParameterListener<V>,
}

impl<V> ListenerEntry<V> {
    /// Identity of the registered listener.
    pub fn id(&self) -> ListenerId {
        self.listener.id()
    }
}

impl<V> Clone for ListenerEntry<V> {
    fn clone(&self) -> Self {
        Self {
            access: self.access,
            listener: self.listener.clone(),
        }
    }
}

impl<V> fmt::Debug for ListenerEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("access", &self.access)
            .field("listener", &self.listener.id())
            .finish()
    }
}
