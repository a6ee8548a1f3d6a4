// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scope configuration surface
//!
//! Options are fixed at scope construction; nothing here is mutable at
//! runtime.

use serde::{Deserialize, Serialize};

use crate::codec::WireMode;

/// Static configuration consumed by a scope at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeOptions {
    /// Cross the boundary as text-encoded JSON instead of binary records.
    #[serde(default)]
    pub use_text_codec: bool,
}

impl ScopeOptions {
    /// Parse options from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The wire encoding this configuration selects.
    pub fn wire_mode(&self) -> WireMode {
        if self.use_text_codec {
            WireMode::Text
        } else {
            WireMode::Binary
        }
    }
}
