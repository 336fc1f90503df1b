use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
};

use tracing::{trace, warn};

use super::{AccessMask, ConfigBus, ListenerFailure, ListenerId, ParameterKey, ParameterValue};
use crate::{BusError, Result};

/// Guards applied to nested dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLimits {
    /// Fail when a key re-enters dispatch for the same access type and would
    /// invoke a listener again.
    pub cycle_detection: bool,
    /// Maximum number of nested dispatch frames per thread.
    pub max_depth: usize,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            cycle_detection: true,
            max_depth: 64,
        }
    }
}

/// Dispatch state of one calling thread.
struct ThreadFrames<K> {
    active: Option<ListenerId>,
    keys: Vec<(K, AccessMask)>,
}

impl<K> Default for ThreadFrames<K> {
    fn default() -> Self {
        Self {
            active: None,
            keys: Vec::new(),
        }
    }
}

/// Transient dispatch state, tracked separately for every calling thread.
///
/// Holds the active listener marker and the stack of (key, access) pairs
/// whose dispatch is in flight on that thread's call stack.
pub(super) struct DispatchFrames<K> {
    threads: Mutex<HashMap<ThreadId, ThreadFrames<K>>>,
    limits: DispatchLimits,
}

impl<K: ParameterKey> DispatchFrames<K> {
    pub(super) fn new(limits: DispatchLimits) -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            limits,
        }
    }

    pub(super) fn limits(&self) -> DispatchLimits {
        self.limits
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ThreadId, ThreadFrames<K>>> {
        self.threads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Listener currently running on the calling thread, if any.
    pub(super) fn active(&self) -> Option<ListenerId> {
        self.lock()
            .get(&thread::current().id())
            .and_then(|frames| frames.active)
    }

    /// Pushes a frame for `key` and `access`, checking the depth ceiling and,
    /// when the same pair is already being dispatched, the cycle rule.
    ///
    /// A write listener reading back its own key opens a READ frame under the
    /// WRITE frame, which is not a cycle.
    ///
    /// Only called once at least one listener is known to fire.
    fn enter(&self, key: &K, access: AccessMask) -> Result<FrameGuard<'_, K>> {
        let thread_id = thread::current().id();
        let mut threads = self.lock();
        let frames = threads.entry(thread_id).or_default();

        let depth = frames.keys.len() + 1;
        if depth > self.limits.max_depth {
            let error = BusError::DepthExceeded {
                key: key.to_string(),
                depth,
                limit: self.limits.max_depth,
            };
            Self::discard_if_idle(&mut threads, thread_id);
            return Err(error);
        }

        if self.limits.cycle_detection
            && frames
                .keys
                .iter()
                .any(|(open, open_access)| open == key && *open_access == access)
        {
            let chain = frames
                .keys
                .iter()
                .map(|(open, _)| open.to_string())
                .chain(std::iter::once(key.to_string()))
                .collect::<Vec<_>>()
                .join(" -> ");
            let error = BusError::CycleDetected {
                key: key.to_string(),
                chain,
            };
            Self::discard_if_idle(&mut threads, thread_id);
            return Err(error);
        }

        frames.keys.push((key.clone(), access));
        let saved = frames.active;

        Ok(FrameGuard {
            frames: self,
            thread_id,
            saved,
        })
    }

    #[cfg(test)]
    pub(super) fn is_idle(&self) -> bool {
        self.lock().is_empty()
    }

    fn discard_if_idle(threads: &mut HashMap<ThreadId, ThreadFrames<K>>, thread_id: ThreadId) {
        if threads
            .get(&thread_id)
            .is_some_and(|f| f.keys.is_empty() && f.active.is_none())
        {
            threads.remove(&thread_id);
        }
    }
}

/// Restores the active listener marker and pops the key frame on drop,
/// including while unwinding from a panicking listener.
struct FrameGuard<'a, K: ParameterKey> {
    frames: &'a DispatchFrames<K>,
    thread_id: ThreadId,
    saved: Option<ListenerId>,
}

impl<K: ParameterKey> FrameGuard<'_, K> {
    /// Listener whose access caused this dispatch.
    fn trigger(&self) -> Option<ListenerId> {
        self.saved
    }

    fn activate(&self, id: ListenerId) {
        if let Some(frames) = self.frames.lock().get_mut(&self.thread_id) {
            frames.active = Some(id);
        }
    }
}

impl<K: ParameterKey> Drop for FrameGuard<'_, K> {
    fn drop(&mut self) {
        let mut threads = self.frames.lock();
        if let Some(frames) = threads.get_mut(&self.thread_id) {
            frames.keys.pop();
            frames.active = self.saved;
        }
        DispatchFrames::discard_if_idle(&mut threads, self.thread_id);
    }
}

impl<K: ParameterKey, V: ParameterValue> ConfigBus<K, V> {
    /// Invokes every listener on `key` whose mask intersects `access`, in
    /// registration order, skipping the listener whose own access caused
    /// this dispatch.
    ///
    /// Listener errors go to the error handler; an `Err` from the handler
    /// aborts the remaining listeners. Panics unwind through here to the
    /// operation boundary.
    pub(super) fn dispatch(&self, key: &K, access: AccessMask, previous: Option<&V>) -> Result<()> {
        let trigger = self.frames.active();
        let entries = {
            let registry = self.registry();
            if !registry.has_eligible(key, access, trigger) {
                return Ok(());
            }
            registry.listeners_for(key)
        };

        let frame = self.frames.enter(key, access)?;

        for entry in &entries {
            if !entry.access.matches(access) || Some(entry.id()) == frame.trigger() {
                continue;
            }

            frame.activate(entry.id());
            trace!(key = %key, %access, listener = %entry.id(), "invoking parameter listener");

            if let Err(error) = entry.listener.call(previous, access) {
                warn!(
                    key = %key,
                    %access,
                    listener = %entry.id(),
                    error = %error,
                    "parameter listener returned an error"
                );

                let handler = self.error_handler();
                handler(ListenerFailure {
                    listener: entry.id(),
                    access,
                    key: key.clone(),
                    error,
                })?;
            }
        }

        Ok(())
    }
}
