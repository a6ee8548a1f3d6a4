// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event metadata lookup with explicit, ordered prefix rules

use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::EventDescriptor;
use crate::error::BridgeError;

/// Read-only table mapping event identifiers to descriptors.
///
/// Exact entries always win. Otherwise the longest registered prefix
/// matching the identifier applies; every exact entry also acts as a prefix
/// for identifiers extending it, and `family` registers a prefix rule with
/// no exact entry. Ties on prefix length resolve to the earliest
/// registration, so lookup is deterministic by construction order, never by
/// table iteration order.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    exact: HashMap<String, Arc<EventDescriptor>>,
    prefixes: Vec<(String, Arc<EventDescriptor>)>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own identifier.
    pub fn event(mut self, descriptor: EventDescriptor) -> Self {
        let descriptor = Arc::new(descriptor);
        self.insert_prefix(descriptor.id().to_string(), Arc::clone(&descriptor));
        self.exact
            .insert(descriptor.id().to_string(), descriptor);
        self
    }

    /// Register a prefix rule covering an identifier family.
    pub fn family(mut self, prefix: impl Into<String>, descriptor: EventDescriptor) -> Self {
        self.insert_prefix(prefix.into(), Arc::new(descriptor));
        self
    }

    /// Look up the descriptor for an identifier.
    pub fn lookup(&self, id: &str) -> Result<&Arc<EventDescriptor>, BridgeError> {
        if let Some(descriptor) = self.exact.get(id) {
            return Ok(descriptor);
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| id.starts_with(prefix.as_str()))
            .map(|(_, descriptor)| descriptor)
            .ok_or_else(|| BridgeError::UnknownEvent(id.to_string()))
    }

    /// Whether any entry or rule covers the identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_ok()
    }

    // Longest prefix first; stable insert keeps earlier rules ahead on ties.
    fn insert_prefix(&mut self, prefix: String, descriptor: Arc<EventDescriptor>) {
        let at = self
            .prefixes
            .iter()
            .position(|(existing, _)| existing.len() < prefix.len())
            .unwrap_or(self.prefixes.len());
        self.prefixes.insert(at, (prefix, descriptor));
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
