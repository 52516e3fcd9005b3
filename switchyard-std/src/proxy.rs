//! # Proxy
//!
//! The top-level transaction boundary. Every call runs the dispatcher against
//! a staged copy of the state; the copy replaces the live state only if the
//! whole call tree succeeded. A failed call drops the copy, so none of its
//! registry changes, flag writes, storage writes or events are observable.
//! `&mut self` serializes top-level calls.

use crate::{builder::ProxyBuilder, calls};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use switchyard_core::{
    Address, Bytes, CallContext, Calldata, CapabilityId, ModuleCut, ModuleHost, OperationCode,
    ProxyError, ProxyEvent, ProxyState, Receipt, codec,
};

/// A dynamic dispatch proxy.
#[derive(Debug)]
pub struct Proxy {
    host: Arc<ModuleHost>,
    state: ProxyState,
    log: Vec<ProxyEvent>,
}

impl Proxy {
    /// Start configuring a proxy deployed on `host`.
    pub fn builder(host: Arc<ModuleHost>) -> ProxyBuilder {
        ProxyBuilder::new(host)
    }

    pub(crate) fn from_parts(host: Arc<ModuleHost>, state: ProxyState) -> Self {
        Self {
            host,
            state,
            log: Vec::new(),
        }
    }

    /// The proxy's own address.
    pub fn address(&self) -> Address {
        self.state.address()
    }

    /// The host the proxy's modules are deployed on.
    pub fn host(&self) -> &Arc<ModuleHost> {
        &self.host
    }

    /// The committed state.
    pub fn state(&self) -> &ProxyState {
        &self.state
    }

    /// Every event of every committed call, oldest first.
    pub fn events(&self) -> &[ProxyEvent] {
        &self.log
    }

    pub(crate) fn state_mut(&mut self) -> &mut ProxyState {
        &mut self.state
    }

    /// Run one top-level call.
    pub async fn call(
        &mut self,
        caller: Address,
        calldata: Calldata,
        value: u128,
    ) -> Result<Receipt, ProxyError> {
        let selector = calldata.selector();
        #[cfg(feature = "tracing")]
        tracing::debug!(%selector, %caller, value, "dispatch");

        let mut staged = self.state.clone();
        let result = {
            let mut ctx = CallContext::new(&mut staged, &self.host, caller, value);
            ctx.dispatch(calldata).await
        };
        let result = result.and_then(|output| {
            staged.balance = staged
                .balance
                .checked_add(value)
                .ok_or_else(|| ProxyError::revert("balance overflow"))?;
            Ok(output)
        });

        match result {
            Ok(output) => {
                let events = staged.take_events();
                self.state = staged;
                self.log.extend(events.iter().cloned());

                #[cfg(feature = "tracing")]
                {
                    tracing::debug!(%selector, events = events.len(), "committed");
                    events.iter().for_each(log_committed);
                }

                Ok(Receipt { output, events })
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%selector, %caller, error = %err, "rolled back");
                #[cfg(not(feature = "tracing"))]
                let _ = selector;

                Err(err)
            }
        }
    }

    /// Run a call that is never committed and return its output.
    pub async fn view(&self, caller: Address, calldata: Calldata) -> Result<Bytes, ProxyError> {
        let mut scratch = self.state.clone();
        let mut ctx = CallContext::new(&mut scratch, &self.host, caller, 0);
        ctx.dispatch(calldata).await
    }

    /// Encode `args` for `selector` and run it as a top-level call.
    pub async fn dispatch<T: Serialize + ?Sized>(
        &mut self,
        caller: Address,
        selector: OperationCode,
        args: &T,
        value: u128,
    ) -> Result<Receipt, ProxyError> {
        self.call(caller, Calldata::encode(selector, args)?, value)
            .await
    }

    async fn view_as<T: DeserializeOwned>(&self, calldata: Calldata) -> Result<T, ProxyError> {
        let raw = self.view(Address::ZERO, calldata).await?;
        codec::decode(&raw)
    }

    /// Apply a cut, then run `init` with `payload` unless `init` is zero.
    pub async fn cut(
        &mut self,
        caller: Address,
        cuts: &[ModuleCut],
        init: Address,
        payload: impl Into<Bytes>,
    ) -> Result<Receipt, ProxyError> {
        let calldata = calls::cut(cuts, init, &payload.into())?;
        self.call(caller, calldata, 0).await
    }

    /// Dispatch `requests` in order, all or nothing. Returns each output.
    pub async fn batch_invoke(
        &mut self,
        caller: Address,
        requests: &[Calldata],
        value: u128,
    ) -> Result<Vec<Bytes>, ProxyError> {
        let receipt = self.call(caller, calls::batch_invoke(requests)?, value).await?;
        receipt.decode()
    }

    /// Hand governance to `new`.
    pub async fn transfer_principal(
        &mut self,
        caller: Address,
        new: Address,
    ) -> Result<Receipt, ProxyError> {
        self.call(caller, calls::transfer_principal(new)?, 0).await
    }

    /// Write capability flags.
    pub async fn set_capabilities(
        &mut self,
        caller: Address,
        ids: &[CapabilityId],
        flags: &[bool],
    ) -> Result<Receipt, ProxyError> {
        self.call(caller, calls::set_capabilities(ids, flags)?, 0)
            .await
    }

    /// The governance principal.
    pub async fn current_principal(&self) -> Result<Address, ProxyError> {
        self.view_as(calls::current_principal()).await
    }

    /// Whether the proxy advertises capability `id`.
    pub async fn supports_capability(&self, id: CapabilityId) -> Result<bool, ProxyError> {
        self.view_as(calls::supports_capability(id)?).await
    }

    /// Distinct modules that own at least one operation.
    pub async fn list_modules(&self) -> Result<Vec<Address>, ProxyError> {
        self.view_as(calls::list_modules()).await
    }

    /// Every module with its operations.
    pub async fn modules(&self) -> Result<calls::ModuleListing, ProxyError> {
        self.view_as(calls::modules()).await
    }

    /// Operations routed to `module`.
    pub async fn operations_of(&self, module: Address) -> Result<Vec<OperationCode>, ProxyError> {
        self.view_as(calls::operations_of(module)?).await
    }

    /// The module `op` is routed to, or zero.
    pub async fn module_of(&self, op: OperationCode) -> Result<Address, ProxyError> {
        self.view_as(calls::module_of(op)?).await
    }
}

/// Governance changes are logged at info once they are committed.
#[cfg(feature = "tracing")]
fn log_committed(event: &ProxyEvent) {
    match event {
        ProxyEvent::RegistryCut { cuts, init, .. } => {
            tracing::info!(entries = cuts.len(), %init, "registry cut");
        }
        ProxyEvent::OwnershipTransferred { previous, new } => {
            tracing::info!(%previous, %new, "ownership transferred");
        }
        ProxyEvent::CapabilityUpdated { id, supported } => {
            tracing::info!(%id, supported, "capability updated");
        }
        ProxyEvent::Log { .. } => {}
    }
}
