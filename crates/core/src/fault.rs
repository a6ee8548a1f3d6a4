// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured fault escalation for foreign-invoked dispatch
//!
//! Execution inside a trampoline was started by the native side: unwinding
//! back across that boundary is not an option, and losing the error silently
//! is unacceptable. Every fault is logged with full context and forwarded to
//! the handler installed by the host, if any.

use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::error::{ListenerError, NativeCallError, PayloadDecodeError};

/// A fault raised inside foreign-invoked dispatch.
#[derive(Debug)]
pub enum Fault {
    /// Inbound payload failed to decode; listeners were not invoked.
    Decode {
        event: String,
        error: PayloadDecodeError,
    },
    /// A listener invocation failed; its siblings still ran.
    Listener {
        event: String,
        index: usize,
        error: ListenerError,
    },
    /// The teardown call releasing a native-owned record failed.
    Teardown {
        event: String,
        error: NativeCallError,
    },
}

/// Receiver half handed to the host via `Scope::fault_handler`.
pub type FaultReceiver = mpsc::UnboundedReceiver<Fault>;

/// Reporting side consulted by the dispatcher.
#[derive(Clone, Default)]
pub struct FaultSink {
    handler: Arc<RwLock<Option<mpsc::UnboundedSender<Fault>>>>,
}

impl FaultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler that receives all subsequent faults.
    pub fn subscribe(&self) -> FaultReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = self.handler.write().unwrap_or_else(|e| e.into_inner());
        *handler = Some(tx);
        rx
    }

    /// Report a fault: log it, then forward it to the installed handler.
    pub fn report(&self, fault: Fault) {
        match &fault {
            Fault::Decode { event, error } => {
                tracing::error!(event = %event, error = %error, "inbound payload decode failed");
            }
            Fault::Listener {
                event,
                index,
                error,
            } => {
                tracing::error!(event = %event, index, error = %error, "listener failed");
            }
            Fault::Teardown { event, error } => {
                tracing::error!(event = %event, error = %error, "record teardown call failed");
            }
        }
        if let Some(tx) = self
            .handler
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            let _ = tx.send(fault);
        }
    }
}
