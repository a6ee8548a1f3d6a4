// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event metadata: descriptors and the lookup registry
//!
//! This module provides:
//! - `EventDescriptor` - Static wire-level metadata for one event
//! - `EventRegistry` - Exact lookup plus ordered longest-prefix fallback

mod descriptor;
mod registry;

pub use descriptor::{EventDescriptor, ExtraArgs};
pub use registry::EventRegistry;
