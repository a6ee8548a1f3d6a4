//! Fake native endpoint for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::codec::{BuildOptions, RecordCodec};
use crate::error::{CodecError, NativeCallError};

use super::adapter::NativeAdapter;
use super::value::{
    FacadeHandle, InboundPayload, NativeValue, ProtocolHandle, RecordRef, Trampoline,
};

/// Recorded interaction with the fake endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCallRecord {
    Call {
        name: String,
        args: Vec<NativeValue>,
    },
    ResolveFacade {
        name: String,
        protocol: u64,
    },
    RegisterTrampoline {
        name: String,
        facade: u64,
        extra: Vec<NativeValue>,
    },
}

/// Shared state for the fake endpoint.
#[derive(Default)]
struct FakeState {
    calls: Vec<NativeCallRecord>,
    trampolines: HashMap<String, Trampoline>,
    records: HashMap<RecordRef, Value>,
    builder_calls: Vec<(Value, BuildOptions)>,
    drop_calls: Vec<String>,
    dropped: Vec<RecordRef>,
    next_handle: u64,
    next_record: u64,
    // Configurable failure modes
    call_fails: bool,
    resolve_fails: bool,
}

/// In-process native endpoint with call recording and a record arena.
///
/// Records allocated here are "native-owned": they stay in the arena until a
/// call marked as a teardown call releases them, which is how tests observe
/// leaks.
#[derive(Clone, Default)]
pub struct FakeNative {
    state: Arc<Mutex<FakeState>>,
}

impl FakeNative {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded interactions, in order.
    pub fn calls(&self) -> Vec<NativeCallRecord> {
        self.lock().calls.clone()
    }

    /// Recorded plain calls matching `name`.
    pub fn calls_named(&self, name: &str) -> Vec<NativeCallRecord> {
        self.lock()
            .calls
            .iter()
            .filter(|record| matches!(record, NativeCallRecord::Call { name: n, .. } if n == name))
            .cloned()
            .collect()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Treat `name` as a teardown call releasing its record argument.
    pub fn mark_drop_call(&self, name: &str) {
        self.lock().drop_calls.push(name.to_string());
    }

    /// Make subsequent calls and registrations fail.
    pub fn fail_calls(&self, fail: bool) {
        self.lock().call_fails = fail;
    }

    /// Make facade resolution fail.
    pub fn fail_resolve(&self, fail: bool) {
        self.lock().resolve_fails = fail;
    }

    /// Allocate a native-owned record holding `payload`.
    pub fn alloc_record(&self, payload: Value) -> RecordRef {
        let mut state = self.lock();
        state.next_record += 1;
        let record = RecordRef(state.next_record);
        state.records.insert(record, payload);
        record
    }

    /// Records allocated and not yet released.
    pub fn live_records(&self) -> usize {
        self.lock().records.len()
    }

    /// Records released through marked teardown calls, in order.
    pub fn dropped(&self) -> Vec<RecordRef> {
        self.lock().dropped.clone()
    }

    /// Arguments every builder invocation received.
    pub fn builder_calls(&self) -> Vec<(Value, BuildOptions)> {
        self.lock().builder_calls.clone()
    }

    /// Whether a trampoline is registered under `call_name`.
    pub fn has_trampoline(&self, call_name: &str) -> bool {
        self.lock().trampolines.contains_key(call_name)
    }

    /// Deliver a text payload to the trampoline registered under `call_name`.
    ///
    /// Runs the trampoline outside the fake's lock, the way the foreign
    /// event-delivery thread would, so dispatch may reenter the endpoint.
    pub fn deliver_text(&self, call_name: &str, text: &str) {
        let trampoline = self.trampoline(call_name);
        trampoline.fire(InboundPayload::Text(text.to_string()));
    }

    /// Allocate a record for `payload` and deliver it to `call_name`.
    pub fn deliver_record(&self, call_name: &str, payload: Value) -> RecordRef {
        let record = self.alloc_record(payload);
        let trampoline = self.trampoline(call_name);
        trampoline.fire(InboundPayload::Record(record));
        record
    }

    /// A codec backed by this endpoint's record arena.
    pub fn codec(&self) -> RecordCodec {
        let build_state = Arc::clone(&self.state);
        let read_state = Arc::clone(&self.state);
        RecordCodec::new(
            move |payload, options| {
                let mut state = build_state.lock().unwrap_or_else(|e| e.into_inner());
                state.builder_calls.push((payload.clone(), options.clone()));
                state.next_record += 1;
                let record = RecordRef(state.next_record);
                state.records.insert(record, payload.clone());
                Ok(record)
            },
            move |record| {
                let state = read_state.lock().unwrap_or_else(|e| e.into_inner());
                state
                    .records
                    .get(&record)
                    .cloned()
                    .ok_or_else(|| CodecError(format!("unknown record {}", record.0)))
            },
        )
    }

    fn trampoline(&self, call_name: &str) -> Trampoline {
        self.lock()
            .trampolines
            .get(call_name)
            .cloned()
            .expect("no trampoline registered under that call name")
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NativeAdapter for FakeNative {
    fn call(&self, name: &str, args: &[NativeValue]) -> Result<(), NativeCallError> {
        let mut state = self.lock();
        if state.call_fails {
            return Err(NativeCallError::new(name, "endpoint unavailable"));
        }
        state.calls.push(NativeCallRecord::Call {
            name: name.to_string(),
            args: args.to_vec(),
        });
        if state.drop_calls.iter().any(|drop_call| drop_call == name) {
            for arg in args {
                if let NativeValue::Record(record) = arg {
                    state.records.remove(record);
                    state.dropped.push(*record);
                }
            }
        }
        Ok(())
    }

    fn resolve_facade(
        &self,
        name: &str,
        protocol: &ProtocolHandle,
    ) -> Result<FacadeHandle, NativeCallError> {
        let mut state = self.lock();
        if state.resolve_fails {
            return Err(NativeCallError::new(name, "no such facade"));
        }
        state.calls.push(NativeCallRecord::ResolveFacade {
            name: name.to_string(),
            protocol: protocol.0,
        });
        state.next_handle += 1;
        Ok(FacadeHandle::new(state.next_handle))
    }

    fn register_trampoline(
        &self,
        name: &str,
        facade: &FacadeHandle,
        extra: Vec<NativeValue>,
        trampoline: Trampoline,
    ) -> Result<(), NativeCallError> {
        let mut state = self.lock();
        if state.call_fails {
            return Err(NativeCallError::new(name, "endpoint unavailable"));
        }
        state.calls.push(NativeCallRecord::RegisterTrampoline {
            name: name.to_string(),
            facade: facade.raw(),
            extra,
        });
        state.trampolines.insert(name.to_string(), trampoline);
        Ok(())
    }
}
