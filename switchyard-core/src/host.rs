//! The deployment table.
//!
//! Stands in for the host environment's "code at address" primitive: modules
//! are deployed once, receive an address, and are immutable afterwards. The
//! registry only ever stores addresses; the host resolves them to code.

use crate::{
    error::ProxyError,
    id::Address,
    module::{DynModule, Module},
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Deployed modules by address.
pub struct ModuleHost {
    code: RwLock<HashMap<Address, Arc<dyn DynModule>>>,
    next: AtomicU64,
}

impl Default for ModuleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModuleHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHost")
            .field("deployed", &self.code.read().len())
            .finish()
    }
}

impl ModuleHost {
    /// An empty host.
    pub fn new() -> Self {
        Self {
            code: RwLock::new(HashMap::new()),
            next: AtomicU64::new(1),
        }
    }

    /// A fresh address with no code behind it yet.
    pub fn allocate(&self) -> Address {
        Address::from_index(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Deploy a module at a fresh address.
    pub fn deploy<M: Module>(&self, module: M) -> Address {
        self.deploy_arc(Arc::new(module))
    }

    /// Deploy an already shared module at a fresh address.
    pub fn deploy_arc(&self, module: Arc<dyn DynModule>) -> Address {
        let address = self.allocate();
        self.code.write().insert(address, module);
        address
    }

    /// Place code at an address obtained from [`allocate`](Self::allocate).
    ///
    /// Code is immutable once placed.
    pub fn install(&self, address: Address, module: Arc<dyn DynModule>) -> Result<(), ProxyError> {
        if address.is_zero() {
            return Err(ProxyError::AddressZero);
        }
        let mut code = self.code.write();
        if code.contains_key(&address) {
            return Err(ProxyError::revert(format!("{address} already has code")));
        }
        code.insert(address, module);
        Ok(())
    }

    /// The module deployed at `address`.
    pub fn code_at(&self, address: Address) -> Option<Arc<dyn DynModule>> {
        self.code.read().get(&address).cloned()
    }

    /// Whether `address` has deployed code.
    pub fn has_code(&self, address: Address) -> bool {
        self.code.read().contains_key(&address)
    }

    /// Number of deployed modules.
    pub fn len(&self) -> usize {
        self.code.read().len()
    }

    /// Whether nothing is deployed.
    pub fn is_empty(&self) -> bool {
        self.code.read().is_empty()
    }
}
