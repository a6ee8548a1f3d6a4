// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the bridge core

use thiserror::Error;

/// Boxed error returned by an application listener.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced synchronously by the public `Scope` API.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Identifier matches no descriptor, exact or prefix.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    /// The native call boundary reported failure.
    #[error(transparent)]
    Native(#[from] NativeCallError),
    /// Outbound payload could not be encoded for the wire.
    #[error("payload encode failed for `{event}`: {reason}")]
    Encode { event: String, reason: String },
    /// The scope has been destroyed; no further calls are accepted.
    #[error("scope destroyed")]
    Destroyed,
}

/// Failure reported by the native call boundary itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("native call `{call}` failed: {reason}")]
pub struct NativeCallError {
    pub call: String,
    pub reason: String,
}

impl NativeCallError {
    pub fn new(call: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            reason: reason.into(),
        }
    }
}

/// Failure raised by a record codec while building or reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CodecError(pub String);

/// Inbound payload could not be decoded during dispatch.
#[derive(Debug, Error)]
pub enum PayloadDecodeError {
    /// Text payload failed structured parsing.
    #[error("invalid text payload: {0}")]
    Text(#[from] serde_json::Error),
    /// Binary record failed to map through its reader.
    #[error("record read failed: {0}")]
    Record(#[from] CodecError),
    /// Binary record arrived but no reader is configured for the event.
    #[error("no record codec configured for `{0}`")]
    NoCodec(String),
}
