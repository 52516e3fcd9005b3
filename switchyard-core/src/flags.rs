//! Capability flags: which externally defined capabilities the proxy claims
//! to support.

use crate::{error::ProxyError, id::CapabilityId};
use std::collections::HashMap;

/// A flat capability id → bool table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityFlags {
    flags: HashMap<CapabilityId, bool>,
}

impl CapabilityFlags {
    /// An empty table; nothing is supported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is advertised. [`CapabilityId::INVALID`] never is.
    pub fn supports(&self, id: CapabilityId) -> bool {
        id != CapabilityId::INVALID && self.flags.get(&id).copied().unwrap_or(false)
    }

    /// Write one flag.
    pub fn set(&mut self, id: CapabilityId, supported: bool) {
        self.flags.insert(id, supported);
    }

    /// Write a batch of flags. Fails without writing anything if the lengths
    /// differ.
    pub fn set_many(&mut self, ids: &[CapabilityId], flags: &[bool]) -> Result<(), ProxyError> {
        if ids.len() != flags.len() {
            return Err(ProxyError::LengthMismatch {
                ids: ids.len(),
                flags: flags.len(),
            });
        }
        for (&id, &supported) in ids.iter().zip(flags) {
            self.set(id, supported);
        }
        Ok(())
    }

    /// Every id currently advertised as supported.
    pub fn supported(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.flags
            .iter()
            .filter(|(id, on)| **on && **id != CapabilityId::INVALID)
            .map(|(id, _)| *id)
    }
}
