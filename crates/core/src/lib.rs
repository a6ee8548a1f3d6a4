//! ferry-core: Core library for the ferry pub/sub bridge
//!
//! This crate provides:
//! - A static event metadata registry with ordered prefix rules for
//!   parameterized event families
//! - Per-scope listener registries with `on`/`once`/`off` semantics
//! - A narrow native call boundary (`NativeAdapter`) and a facade-scoped
//!   bridge owning every installed trampoline
//! - Two mutually exclusive wire encodings for the same event set:
//!   text-encoded JSON or native binary records
//! - A dispatcher that relays native callbacks to listeners and releases
//!   native-owned payloads

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod fault;
pub mod listeners;
pub mod native;

pub mod dispatch;
pub mod scope;

// Re-exports
pub use codec::{BuildOptions, RecordCodec, WireMode, TEXT_CALL_SUFFIX};
pub use config::ScopeOptions;
pub use error::{BridgeError, CodecError, ListenerError, NativeCallError, PayloadDecodeError};
pub use events::{EventDescriptor, EventRegistry, ExtraArgs};
pub use fault::{Fault, FaultReceiver, FaultSink};
pub use listeners::{Listener, ListenerTable, Payload};
pub use scope::Scope;

// Re-export the native boundary
pub use native::{
    FacadeHandle, InboundPayload, NativeAdapter, NativeBridge, NativeValue, ProtocolHandle,
    RecordRef, Trampoline,
};

#[cfg(any(test, feature = "test-support"))]
pub use native::{FakeNative, NativeCallRecord};
