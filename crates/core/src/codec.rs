// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire encodings: text-encoded JSON or native binary records
//!
//! Exactly one mode is active per scope for its whole lifetime. Text mode
//! crosses the boundary as a single JSON string argument against a call name
//! carrying the fixed marker; binary mode crosses as a reference to a native
//! record built and read by a capability-typed codec.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CodecError, PayloadDecodeError};
use crate::native::RecordRef;

/// Marker appended to wire call names when payloads cross as text.
pub const TEXT_CALL_SUFFIX: &str = "_json";

/// Which encoding a scope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMode {
    /// Payloads cross as length-known JSON text.
    Text,
    /// Payloads cross as references to native binary records.
    Binary,
}

/// Caller-configured options consulted when building a native record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Encode absent optional fields as native nulls instead of omitting them.
    pub keep_nulls: bool,
    /// Fields whose values cross as raw byte arrays rather than text.
    pub byte_fields: Vec<String>,
}

type BuildFn = dyn Fn(&Value, &BuildOptions) -> Result<RecordRef, CodecError> + Send + Sync;
type ReadFn = dyn Fn(RecordRef) -> Result<Value, CodecError> + Send + Sync;

/// Capability-typed build/read pair for one record shape.
///
/// Selected at registry construction. Events without their own codec fall
/// back to the scope-level default.
#[derive(Clone)]
pub struct RecordCodec {
    build: Arc<BuildFn>,
    read: Arc<ReadFn>,
}

impl RecordCodec {
    pub fn new(
        build: impl Fn(&Value, &BuildOptions) -> Result<RecordRef, CodecError>
            + Send
            + Sync
            + 'static,
        read: impl Fn(RecordRef) -> Result<Value, CodecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            build: Arc::new(build),
            read: Arc::new(read),
        }
    }

    /// Construct-then-serialize an outbound payload into a native record.
    pub fn build(&self, payload: &Value, options: &BuildOptions) -> Result<RecordRef, CodecError> {
        (self.build)(payload, options)
    }

    /// Map an inbound native record back to structured data.
    pub fn read(&self, record: RecordRef) -> Result<Value, CodecError> {
        (self.read)(record)
    }
}

impl fmt::Debug for RecordCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCodec").finish_non_exhaustive()
    }
}

/// Serialize an outbound payload for text mode.
pub fn encode_text(payload: &Value) -> String {
    payload.to_string()
}

/// Deserialize an inbound text payload.
pub fn decode_text(text: &str) -> Result<Value, PayloadDecodeError> {
    Ok(serde_json::from_str(text)?)
}
