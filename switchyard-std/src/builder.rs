//! Proxy construction.

use crate::{
    batch::BatchInvoker,
    modules::{CutModule, IntrospectionModule, OwnershipModule},
    proxy::Proxy,
    selectors,
};
use std::sync::Arc;
use switchyard_core::{
    Address, Bytes, CapabilityId, Module, ModuleCut, ModuleHost, ProxyError, ProxyState,
};

/// Builder for [`Proxy`].
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ModuleHost::new());
/// let proxy = Proxy::builder(host.clone())
///     .owner(owner)
///     .standard()
///     .build()
///     .await?;
/// ```
pub struct ProxyBuilder {
    host: Arc<ModuleHost>,
    owner: Address,
    cut_module: Option<Address>,
    capabilities: Vec<(CapabilityId, bool)>,
    standard: bool,
}

impl ProxyBuilder {
    /// Create a new builder for a proxy deployed on `host`.
    pub fn new(host: Arc<ModuleHost>) -> Self {
        Self {
            host,
            owner: Address::ZERO,
            cut_module: None,
            capabilities: Vec::new(),
            standard: false,
        }
    }

    /// The initial governance principal. Required.
    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = owner;
        self
    }

    /// Bind `cut` to an already deployed module instead of a fresh
    /// [`CutModule`].
    pub fn cut_module(mut self, module: Address) -> Self {
        self.cut_module = Some(module);
        self
    }

    /// Advertise (or explicitly deny) a capability from the start.
    pub fn capability(mut self, id: CapabilityId, supported: bool) -> Self {
        self.capabilities.push((id, supported));
        self
    }

    /// Deploy and cut in the standard modules: introspection, ownership and
    /// the capability setter, and advertise their capability ids.
    pub fn standard(mut self) -> Self {
        self.standard = true;
        self
    }

    /// Deploy the proxy.
    ///
    /// Fails with [`ProxyError::AddressZero`] without an owner and with
    /// [`ProxyError::NotAContract`] when the cut module has no code.
    pub async fn build(self) -> Result<Proxy, ProxyError> {
        let Self {
            host,
            owner,
            cut_module,
            capabilities,
            standard,
        } = self;

        if owner.is_zero() {
            return Err(ProxyError::AddressZero);
        }
        let cut_module = match cut_module {
            Some(module) if !host.has_code(module) => return Err(ProxyError::NotAContract(module)),
            Some(module) => module,
            None => host.deploy(CutModule),
        };

        let address = host.allocate();
        let mut state = ProxyState::new(address, owner)?;
        host.install(address, Arc::new(BatchInvoker))?;
        state.registry.add(selectors::BATCH_INVOKE, address)?;
        state.registry.add(selectors::CUT, cut_module)?;

        #[cfg(feature = "tracing")]
        tracing::info!(%address, %owner, %cut_module, "proxy deployed");

        let mut proxy = Proxy::from_parts(host.clone(), state);

        if standard {
            let introspection = host.deploy(IntrospectionModule);
            let ownership = host.deploy(OwnershipModule);
            let cuts = [
                ModuleCut::add(introspection, IntrospectionModule.interface().selectors()),
                ModuleCut::add(ownership, OwnershipModule.interface().selectors()),
                ModuleCut::add(cut_module, vec![selectors::SET_CAPABILITIES]),
            ];
            proxy.cut(owner, &cuts, Address::ZERO, Bytes::new()).await?;

            let flags = &mut proxy.state_mut().flags;
            for id in [
                selectors::CAPABILITY_QUERY,
                selectors::CUT_CAPABILITY,
                selectors::INTROSPECTION_CAPABILITY,
                selectors::OWNERSHIP_CAPABILITY,
            ] {
                flags.set(id, true);
            }
        }

        let flags = &mut proxy.state_mut().flags;
        for (id, supported) in capabilities {
            flags.set(id, supported);
        }

        Ok(proxy)
    }
}
