use std::collections::HashMap;

use super::{AccessMask, ListenerEntry, ListenerId, ParameterKey, ParameterListener};
use crate::{BusError, Result};

/// Outcome of a registry removal, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// No entry matched the key and listener.
    NotFound,
    /// Bits were cleared but the entry still listens for `remaining`.
    Narrowed {
        /// Mask left on the entry
        remaining: AccessMask,
    },
    /// The entry's mask became empty and it was dropped.
    Pruned,
}

/// Per-key ordered listener lists.
///
/// Insertion order within a key is invocation order. A listener id appears
/// at most once per key, and no entry is ever stored with an empty mask.
pub struct ListenerRegistry<K, V> {
    listeners: HashMap<K, Vec<ListenerEntry<V>>>,
}

impl<K: ParameterKey, V> ListenerRegistry<K, V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Registers `listener` on `key`, OR-ing `access` into an existing entry
    /// for the same listener or appending a new one.
    ///
    /// Returns the entry's effective mask.
    ///
    /// # Errors
    /// * `BusError::InvalidArgument` - If `access` is empty
    pub fn add(
        &mut self,
        key: K,
        access: AccessMask,
        listener: &ParameterListener<V>,
    ) -> Result<AccessMask> {
        if access.is_empty() {
            return Err(BusError::InvalidArgument(format!(
                "listener {} on [{key}] must listen for at least one access type",
                listener.id()
            )));
        }

        let entries = self.listeners.entry(key).or_default();

        if let Some(entry) = entries.iter_mut().find(|e| e.id() == listener.id()) {
            entry.access |= access;
            return Ok(entry.access);
        }

        entries.push(ListenerEntry {
            access,
            listener: listener.clone(),
        });

        Ok(access)
    }

    /// Clears `access` from the entry for `id` on `key`, pruning the entry
    /// once its mask is empty.
    pub fn remove(&mut self, key: &K, access: AccessMask, id: ListenerId) -> Removal {
        let Some(entries) = self.listeners.get_mut(key) else {
            return Removal::NotFound;
        };

        let Some(index) = entries.iter().position(|e| e.id() == id) else {
            return Removal::NotFound;
        };

        entries[index].access.remove(access);
        let remaining = entries[index].access;

        if !remaining.is_empty() {
            return Removal::Narrowed { remaining };
        }

        entries.remove(index);
        if entries.is_empty() {
            self.listeners.remove(key);
        }

        Removal::Pruned
    }

    /// Returns a copy of the entries registered on `key`, in registration order.
    pub fn listeners_for(&self, key: &K) -> Vec<ListenerEntry<V>> {
        self.listeners.get(key).cloned().unwrap_or_default()
    }

    /// Returns true when at least one entry on `key` would fire for `access`
    /// and is not `skip`.
    pub fn has_eligible(&self, key: &K, access: AccessMask, skip: Option<ListenerId>) -> bool {
        self.listeners.get(key).is_some_and(|entries| {
            entries
                .iter()
                .any(|e| e.access.matches(access) && Some(e.id()) != skip)
        })
    }

    /// Number of keys that have at least one listener.
    pub fn key_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<K: ParameterKey, V> Default for ListenerRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
