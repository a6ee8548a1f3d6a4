// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The native call boundary
//!
//! This module provides:
//! - `NativeAdapter` - The narrow trait the foreign collaborator implements
//! - `NativeBridge` - Facade-scoped call plumbing and trampoline ownership
//! - Opaque wire values: handles, record references, trampolines

mod adapter;
mod bridge;
mod value;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use adapter::NativeAdapter;
pub use bridge::NativeBridge;
pub use value::{
    FacadeHandle, InboundPayload, NativeValue, ProtocolHandle, RecordRef, Trampoline,
};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNative, NativeCallRecord};
