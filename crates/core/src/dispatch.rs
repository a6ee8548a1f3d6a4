// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The callback trampoline invoked by the native side

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::codec::{decode_text, RecordCodec};
use crate::error::PayloadDecodeError;
use crate::events::EventDescriptor;
use crate::fault::{Fault, FaultSink};
use crate::listeners::{ListenerTable, Payload};
use crate::native::{InboundPayload, NativeAdapter, NativeValue, RecordRef, Trampoline};

/// Builds per-identifier trampolines and carries the shared dispatch state.
///
/// Trampoline entry is treated as arriving on a foreign thread: entries are
/// serialized against each other by the dispatch gate, and faults are
/// reported through the sink instead of unwinding across the boundary.
#[derive(Clone)]
pub struct Dispatcher {
    listeners: Arc<ListenerTable>,
    endpoint: Arc<dyn NativeAdapter>,
    default_codec: Option<RecordCodec>,
    faults: FaultSink,
    gate: Arc<Mutex<()>>,
    destroyed: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(
        listeners: Arc<ListenerTable>,
        endpoint: Arc<dyn NativeAdapter>,
        faults: FaultSink,
        destroyed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            listeners,
            endpoint,
            default_codec: None,
            faults,
            gate: Arc::new(Mutex::new(())),
            destroyed,
        }
    }

    /// Fallback reader for events without their own codec.
    pub fn set_default_codec(&mut self, codec: RecordCodec) {
        self.default_codec = Some(codec);
    }

    /// Construct the trampoline for one event identifier.
    ///
    /// Called once per identifier, on its first subscription. The returned
    /// handle must stay owned for the lifetime of the native registration.
    pub fn trampoline(&self, event_id: &str, descriptor: &Arc<EventDescriptor>) -> Trampoline {
        let dispatcher = self.clone();
        let event_id = event_id.to_string();
        let descriptor = Arc::clone(descriptor);
        Trampoline::new(move |payload| dispatcher.dispatch(&event_id, &descriptor, payload))
    }

    fn dispatch(&self, event_id: &str, descriptor: &EventDescriptor, payload: InboundPayload) {
        let _entry = self.gate.lock().unwrap_or_else(|e| e.into_inner());

        if self.destroyed.load(Ordering::SeqCst) {
            tracing::warn!(event = %event_id, "native dispatch after destroy, dropped");
            return;
        }

        let record = match &payload {
            InboundPayload::Record(record) => Some(*record),
            InboundPayload::Text(_) => None,
        };

        match self.decode(event_id, descriptor, payload) {
            Ok(message) => {
                let snapshot = self.listeners.snapshot(event_id);
                tracing::trace!(event = %event_id, listeners = snapshot.len(), "dispatching");
                for (index, listener) in snapshot.into_iter().enumerate() {
                    if let Err(error) = listener(&message) {
                        self.faults.report(Fault::Listener {
                            event: event_id.to_string(),
                            index,
                            error,
                        });
                    }
                }
            }
            Err(error) => {
                self.faults.report(Fault::Decode {
                    event: event_id.to_string(),
                    error,
                });
            }
        }

        // The native-owned record is released exactly once, even when decode
        // failed or no listener was registered.
        if let Some(record) = record {
            self.release(event_id, descriptor, record);
        }
    }

    fn decode(
        &self,
        event_id: &str,
        descriptor: &EventDescriptor,
        payload: InboundPayload,
    ) -> Result<Payload, PayloadDecodeError> {
        match payload {
            InboundPayload::Text(text) => decode_text(&text),
            InboundPayload::Record(record) => {
                let codec = descriptor
                    .codec()
                    .or(self.default_codec.as_ref())
                    .ok_or_else(|| PayloadDecodeError::NoCodec(event_id.to_string()))?;
                Ok(codec.read(record)?)
            }
        }
    }

    fn release(&self, event_id: &str, descriptor: &EventDescriptor, record: RecordRef) {
        let Some(drop_call) = descriptor.drop_call() else {
            tracing::warn!(event = %event_id, "no teardown call configured, record not released");
            return;
        };
        if let Err(error) = self.endpoint.call(drop_call, &[NativeValue::Record(record)]) {
            self.faults.report(Fault::Teardown {
                event: event_id.to_string(),
                error,
            });
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
