// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public subscribe/publish surface

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::codec::{encode_text, RecordCodec, WireMode, TEXT_CALL_SUFFIX};
use crate::config::ScopeOptions;
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, ListenerError};
use crate::events::EventRegistry;
use crate::fault::{FaultReceiver, FaultSink};
use crate::listeners::{Listener, ListenerTable, Payload};
use crate::native::{NativeAdapter, NativeBridge, NativeValue, ProtocolHandle};

type WeakListener = Weak<dyn Fn(&Payload) -> Result<(), ListenerError> + Send + Sync>;

/// One facade-scoped slice of the native API's event surface.
///
/// A scope owns its listener table, its installed trampolines, and the
/// facade handle they are registered against. Construction resolves the
/// facade exactly once; `destroy` is the single release point for all of it.
pub struct Scope {
    bridge: NativeBridge,
    mode: WireMode,
    subscribe_events: EventRegistry,
    publish_events: EventRegistry,
    listeners: Arc<ListenerTable>,
    dispatcher: Dispatcher,
    default_codec: Option<RecordCodec>,
    faults: FaultSink,
    destroyed: Arc<AtomicBool>,
}

impl Scope {
    /// Connect to the native endpoint and resolve this scope's facade.
    pub fn new(
        native: Arc<dyn NativeAdapter>,
        protocol: &ProtocolHandle,
        facade_name: &str,
        options: ScopeOptions,
    ) -> Result<Self, BridgeError> {
        let bridge = NativeBridge::connect(Arc::clone(&native), facade_name, protocol)?;
        let listeners = Arc::new(ListenerTable::new());
        let faults = FaultSink::new();
        let destroyed = Arc::new(AtomicBool::new(false));
        let dispatcher = Dispatcher::new(
            Arc::clone(&listeners),
            native,
            faults.clone(),
            Arc::clone(&destroyed),
        );
        Ok(Self {
            bridge,
            mode: options.wire_mode(),
            subscribe_events: EventRegistry::new(),
            publish_events: EventRegistry::new(),
            listeners,
            dispatcher,
            default_codec: None,
            faults,
            destroyed,
        })
    }

    /// Events this scope can subscribe to.
    pub fn with_subscribe_events(mut self, registry: EventRegistry) -> Self {
        self.subscribe_events = registry;
        self
    }

    /// Events this scope can publish.
    pub fn with_publish_events(mut self, registry: EventRegistry) -> Self {
        self.publish_events = registry;
        self
    }

    /// Fallback reader/builder for binary events without their own codec.
    pub fn with_default_codec(mut self, codec: RecordCodec) -> Self {
        self.dispatcher.set_default_codec(codec.clone());
        self.default_codec = Some(codec);
        self
    }

    /// Subscribe a listener to an event.
    ///
    /// The first subscription for an identifier installs the native
    /// registration; later subscriptions only append to the sequence.
    /// Returns the listener unchanged.
    pub fn on(&self, event_id: &str, listener: Listener) -> Result<Listener, BridgeError> {
        self.ensure_live()?;
        let descriptor = Arc::clone(self.subscribe_events.lookup(event_id)?);
        if !self.listeners.tracked(event_id) {
            let call_name = self.wire_name(descriptor.call_name());
            let trampoline = self.dispatcher.trampoline(event_id, &descriptor);
            self.bridge.register(
                event_id,
                &call_name,
                descriptor.extra_args(event_id),
                trampoline,
            )?;
        }
        self.listeners.push(event_id, Arc::clone(&listener));
        Ok(listener)
    }

    /// Subscribe a listener that runs at most once, then removes itself.
    ///
    /// Returns the wrapper: cancelling before it fires requires the wrapper
    /// reference, not the original listener.
    pub fn once(&self, event_id: &str, listener: Listener) -> Result<Listener, BridgeError> {
        self.ensure_live()?;
        let table = Arc::clone(&self.listeners);
        let id = event_id.to_string();
        // Weak self-reference: the listener table (and the dispatch snapshot
        // during invocation) hold the strong ones.
        let slot: Arc<Mutex<Option<WeakListener>>> = Arc::new(Mutex::new(None));
        let wrapper: Listener = {
            let slot = Arc::clone(&slot);
            Arc::new(move |payload: &Payload| {
                // Taking the slot makes the wrapper fire at most once even if
                // a racing dispatch snapshotted it before removal.
                let me = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
                match me.and_then(|weak| weak.upgrade()) {
                    Some(me) => {
                        table.remove(&id, &me);
                        listener(payload)
                    }
                    None => Ok(()),
                }
            })
        };
        *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::downgrade(&wrapper));
        self.on(event_id, wrapper)
    }

    /// Remove a previously registered listener.
    ///
    /// Detaches from future dispatch only; the native registration stays
    /// installed for the lifetime of the scope.
    pub fn off(&self, event_id: &str, listener: &Listener) -> Result<bool, BridgeError> {
        self.ensure_live()?;
        self.subscribe_events.lookup(event_id)?;
        Ok(self.listeners.remove(event_id, listener))
    }

    /// Publish a message, or a bare announcement when `payload` is `None`.
    pub fn publish(&self, event_id: &str, payload: Option<&Payload>) -> Result<(), BridgeError> {
        self.ensure_live()?;
        let descriptor = self.publish_events.lookup(event_id)?;
        match payload {
            // Side-effect-only form: bare call name, facade only, both modes.
            None => self.bridge.call_scoped(descriptor.call_name(), Vec::new())?,
            Some(payload) => match self.mode {
                WireMode::Text => {
                    let call_name = format!("{}{}", descriptor.call_name(), TEXT_CALL_SUFFIX);
                    self.bridge
                        .call_scoped(&call_name, vec![NativeValue::Text(encode_text(payload))])?;
                }
                WireMode::Binary => {
                    let codec = descriptor
                        .codec()
                        .or(self.default_codec.as_ref())
                        .ok_or_else(|| BridgeError::Encode {
                            event: event_id.to_string(),
                            reason: "no record codec configured".to_string(),
                        })?;
                    let record = codec
                        .build(payload, descriptor.build_options())
                        .map_err(|error| BridgeError::Encode {
                            event: event_id.to_string(),
                            reason: error.to_string(),
                        })?;
                    self.bridge
                        .call_scoped(descriptor.call_name(), vec![NativeValue::Record(record)])?;
                }
            },
        }
        tracing::debug!(event = %event_id, "published");
        Ok(())
    }

    /// Install a handler receiving faults raised inside native dispatch.
    pub fn fault_handler(&self) -> FaultReceiver {
        self.faults.subscribe()
    }

    /// Tear down the scope: release every trampoline and listener.
    ///
    /// Native invocations arriving after this point are dropped; subsequent
    /// API calls fail with `BridgeError::Destroyed`.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.bridge.release_all();
        self.listeners.clear();
        tracing::debug!("scope destroyed");
    }

    /// The wire encoding this scope was constructed with.
    pub fn wire_mode(&self) -> WireMode {
        self.mode
    }

    /// Number of native registrations installed so far.
    pub fn registration_count(&self) -> usize {
        self.bridge.registration_count()
    }

    fn wire_name(&self, call_name: &str) -> String {
        match self.mode {
            WireMode::Text => format!("{call_name}{TEXT_CALL_SUFFIX}"),
            WireMode::Binary => call_name.to_string(),
        }
    }

    fn ensure_live(&self) -> Result<(), BridgeError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(BridgeError::Destroyed);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
