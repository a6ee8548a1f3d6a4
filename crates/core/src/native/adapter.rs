// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narrow native call boundary

use crate::error::NativeCallError;

use super::value::{FacadeHandle, NativeValue, ProtocolHandle, Trampoline};

/// Adapter for the foreign messaging endpoint.
///
/// Every outbound interaction goes through `call`, and `register_trampoline`
/// is the only path by which the foreign side learns of a managed-side
/// callback. No method blocks on I/O; `call` is fire-and-forget and returns
/// no future — request/response correlation, if any, is the collaborator's
/// concern.
pub trait NativeAdapter: Send + Sync + 'static {
    /// Dispatch a named call across the boundary.
    fn call(&self, name: &str, args: &[NativeValue]) -> Result<(), NativeCallError>;

    /// Resolve the per-scope facade handle. Invoked exactly once per scope.
    fn resolve_facade(
        &self,
        name: &str,
        protocol: &ProtocolHandle,
    ) -> Result<FacadeHandle, NativeCallError>;

    /// Install a trampoline for a wire-level subscription.
    ///
    /// `extra` precedes the trampoline in the foreign calling convention.
    fn register_trampoline(
        &self,
        name: &str,
        facade: &FacadeHandle,
        extra: Vec<NativeValue>,
        trampoline: Trampoline,
    ) -> Result<(), NativeCallError>;
}
