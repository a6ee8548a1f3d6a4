// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static event metadata

use std::fmt;
use std::sync::Arc;

use crate::codec::{BuildOptions, RecordCodec};
use crate::native::NativeValue;

/// Pure function from a literal event identifier to extra call arguments.
///
/// Used by parameterized event families, where part of the identifier is
/// passed as its own wire argument (placed before the trampoline).
pub type ExtraArgs = Arc<dyn Fn(&str) -> Vec<NativeValue> + Send + Sync>;

/// Static metadata mapping an event identifier to its wire-level shape.
///
/// Constructed once at startup and shared read-only across scopes.
#[derive(Clone)]
pub struct EventDescriptor {
    id: String,
    call_name: String,
    drop_call: Option<String>,
    codec: Option<RecordCodec>,
    build_options: BuildOptions,
    extra_args: Option<ExtraArgs>,
}

impl EventDescriptor {
    pub fn new(id: impl Into<String>, call_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_name: call_name.into(),
            drop_call: None,
            codec: None,
            build_options: BuildOptions::default(),
            extra_args: None,
        }
    }

    /// Teardown call releasing a native-owned inbound record.
    pub fn with_drop_call(mut self, name: impl Into<String>) -> Self {
        self.drop_call = Some(name.into());
        self
    }

    /// Record codec for this event's payload shape.
    pub fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Options handed to the record builder on publish.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// Derive extra call arguments from the literal identifier.
    pub fn with_extra_args(
        mut self,
        f: impl Fn(&str) -> Vec<NativeValue> + Send + Sync + 'static,
    ) -> Self {
        self.extra_args = Some(Arc::new(f));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wire-level call name: the subscribe registration or publish entry
    /// point for this event.
    pub fn call_name(&self) -> &str {
        &self.call_name
    }

    pub fn drop_call(&self) -> Option<&str> {
        self.drop_call.as_deref()
    }

    pub fn codec(&self) -> Option<&RecordCodec> {
        self.codec.as_ref()
    }

    pub fn build_options(&self) -> &BuildOptions {
        &self.build_options
    }

    /// Extra arguments for a registration against `event_id`.
    pub fn extra_args(&self, event_id: &str) -> Vec<NativeValue> {
        match &self.extra_args {
            Some(f) => f(event_id),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("id", &self.id)
            .field("call_name", &self.call_name)
            .field("drop_call", &self.drop_call)
            .field("build_options", &self.build_options)
            .field("has_codec", &self.codec.is_some())
            .field("has_extra_args", &self.extra_args.is_some())
            .finish()
    }
}
