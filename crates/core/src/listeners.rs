// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-scope listener registry

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::ListenerError;

/// Structured payload handed to listeners.
pub type Payload = Value;

/// Application callback for one decoded payload.
///
/// Identity for `off` is the `Arc` allocation: keep the handle returned by
/// `on`/`once` to remove it later.
pub type Listener = Arc<dyn Fn(&Payload) -> Result<(), ListenerError> + Send + Sync>;

/// Mutable per-scope table of listener sequences, keyed by the literal
/// identifier used at subscription time.
///
/// Sequences are created on first registration and persist even when
/// emptied by removal — sequence existence doubles as the "native
/// registration installed" marker, which is never reverted.
#[derive(Default)]
pub struct ListenerTable {
    inner: Mutex<HashMap<String, Vec<Listener>>>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sequence has ever been created for `id`.
    pub fn tracked(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Append a listener, creating the sequence if needed.
    pub fn push(&self, id: &str, listener: Listener) {
        self.lock().entry(id.to_string()).or_default().push(listener);
    }

    /// Remove the first pointer-equal match. Returns whether one was removed.
    pub fn remove(&self, id: &str, listener: &Listener) -> bool {
        let mut inner = self.lock();
        let Some(sequence) = inner.get_mut(id) else {
            return false;
        };
        match sequence.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                sequence.remove(index);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the sequence for `id`, empty when absent.
    ///
    /// Dispatch iterates the snapshot, so a listener may remove itself or a
    /// sibling mid-dispatch without corrupting iteration.
    pub fn snapshot(&self, id: &str) -> Vec<Listener> {
        self.lock().get(id).cloned().unwrap_or_default()
    }

    /// Number of listeners currently registered for `id`.
    pub fn count(&self, id: &str) -> usize {
        self.lock().get(id).map_or(0, Vec::len)
    }

    /// Drop every sequence. Used at scope teardown.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Listener>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "listeners_tests.rs"]
mod tests;
