// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Facade-scoped call plumbing and trampoline ownership

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::NativeCallError;

use super::adapter::NativeAdapter;
use super::value::{FacadeHandle, NativeValue, ProtocolHandle, Trampoline};

/// The single choke point for outbound native interaction.
///
/// Owns the facade handle and a strong reference to every installed
/// trampoline. A registration must stay callable for as long as the native
/// side may invoke it, so trampolines are released only through
/// `release_all` at scope teardown — never reclaimed implicitly.
pub struct NativeBridge {
    endpoint: Arc<dyn NativeAdapter>,
    facade: FacadeHandle,
    trampolines: Mutex<HashMap<String, Trampoline>>,
}

impl NativeBridge {
    /// Resolve the facade and wrap the endpoint. Called once per scope.
    pub fn connect(
        endpoint: Arc<dyn NativeAdapter>,
        facade_name: &str,
        protocol: &ProtocolHandle,
    ) -> Result<Self, NativeCallError> {
        let facade = endpoint.resolve_facade(facade_name, protocol)?;
        tracing::debug!(facade = facade.raw(), name = %facade_name, "facade resolved");
        Ok(Self {
            endpoint,
            facade,
            trampolines: Mutex::new(HashMap::new()),
        })
    }

    pub fn endpoint(&self) -> &Arc<dyn NativeAdapter> {
        &self.endpoint
    }

    pub fn facade(&self) -> &FacadeHandle {
        &self.facade
    }

    /// Issue an outbound call with the facade handle prepended.
    pub fn call_scoped(
        &self,
        name: &str,
        mut args: Vec<NativeValue>,
    ) -> Result<(), NativeCallError> {
        args.insert(0, NativeValue::Facade(self.facade.raw()));
        self.endpoint.call(name, &args)
    }

    /// Install a trampoline and retain a strong reference to it.
    pub fn register(
        &self,
        event_id: &str,
        call_name: &str,
        extra: Vec<NativeValue>,
        trampoline: Trampoline,
    ) -> Result<(), NativeCallError> {
        self.endpoint
            .register_trampoline(call_name, &self.facade, extra, trampoline.clone())?;
        self.lock().insert(event_id.to_string(), trampoline);
        tracing::debug!(event = %event_id, call = %call_name, "native subscription installed");
        Ok(())
    }

    /// Whether a trampoline is installed for the identifier.
    pub fn registered(&self, event_id: &str) -> bool {
        self.lock().contains_key(event_id)
    }

    /// Number of installed trampolines.
    pub fn registration_count(&self) -> usize {
        self.lock().len()
    }

    /// Release every retained trampoline. The scope's single teardown point.
    pub fn release_all(&self) {
        let mut installed = self.lock();
        let count = installed.len();
        installed.clear();
        tracing::debug!(count, "trampolines released");
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Trampoline>> {
        self.trampolines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
