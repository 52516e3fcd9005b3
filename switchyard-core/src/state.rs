//! The proxy's persistent state.

use crate::{
    event::ProxyEvent, flags::CapabilityFlags, governance::Governance, id::Address,
    registry::ModuleRegistry, storage::Storage,
};

/// Everything the proxy owns.
///
/// A top-level call runs against a clone of this value and the clone replaces
/// the live state only on success, so a failed call leaves no trace.
#[derive(Debug, Clone)]
pub struct ProxyState {
    address: Address,
    /// Operation routing.
    pub registry: ModuleRegistry,
    /// Advertised capabilities.
    pub flags: CapabilityFlags,
    /// The governance principal.
    pub governance: Governance,
    /// Business state shared by all modules.
    pub storage: Storage,
    /// Value accumulated by committed calls.
    pub balance: u128,
    pending: Vec<ProxyEvent>,
}

impl ProxyState {
    /// Fresh state for a proxy living at `address`, governed by `principal`.
    pub fn new(address: Address, principal: Address) -> Result<Self, crate::ProxyError> {
        Ok(Self {
            address,
            registry: ModuleRegistry::new(address),
            flags: CapabilityFlags::new(),
            governance: Governance::new(principal)?,
            storage: Storage::default(),
            balance: 0,
            pending: Vec::new(),
        })
    }

    /// The proxy's own address, which is also the built-in sentinel.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Queue an event. It becomes visible when the call commits.
    pub fn emit(&mut self, event: ProxyEvent) {
        self.pending.push(event);
    }

    /// Drain the queued events.
    pub fn take_events(&mut self) -> Vec<ProxyEvent> {
        std::mem::take(&mut self.pending)
    }
}
