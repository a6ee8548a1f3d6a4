// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque handles and values that cross the native boundary

use std::fmt;
use std::sync::Arc;

/// Opaque parent protocol handle supplied by the collaborator at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolHandle(pub u64);

/// Opaque per-scope context handle, resolved once at scope construction.
///
/// Exclusively owned by its scope; deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct FacadeHandle(u64);

impl FacadeHandle {
    /// Wrap a raw handle obtained from the facade-resolution call.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value as it appears on the wire.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Reference to a native-owned binary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordRef(pub u64);

/// A value crossing the native call boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue {
    /// Facade context handle scoping the call.
    Facade(u64),
    /// Length-known text argument: text-mode payloads and extra string args.
    Text(String),
    /// Reference to a native-owned binary record.
    Record(RecordRef),
}

/// Payload handed to a trampoline by the native side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    Text(String),
    Record(RecordRef),
}

/// A managed-side function made callable by the native side.
///
/// Handles are strong references to the underlying closure. The bridge
/// retains one per installed registration until scope teardown: the closure
/// must stay valid for as long as the native side may invoke it.
#[derive(Clone)]
pub struct Trampoline {
    inner: Arc<dyn Fn(InboundPayload) + Send + Sync>,
}

impl Trampoline {
    pub fn new(f: impl Fn(InboundPayload) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// Invoke with a payload delivered by the native side.
    pub fn fire(&self, payload: InboundPayload) {
        (self.inner)(payload)
    }
}

impl fmt::Debug for Trampoline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trampoline").finish_non_exhaustive()
    }
}
