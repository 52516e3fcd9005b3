//! Typed calldata for the standard surface.
//!
//! Every builder encodes its arguments with the payload codec, so the result
//! can be handed to [`Proxy::call`](crate::Proxy::call), nested inside a
//! [`batch_invoke`] request, or used as a cut's init payload.

use crate::selectors;
use switchyard_core::{Address, Bytes, Calldata, CapabilityId, ModuleCut, OperationCode, ProxyError};

/// Decoded arguments of `cut`.
pub type CutArgs = (Vec<ModuleCut>, Address, Bytes);

/// Decoded output of `modules()`.
pub type ModuleListing = Vec<(Address, Vec<OperationCode>)>;

/// `cut(cuts, init, payload)`.
pub fn cut(cuts: &[ModuleCut], init: Address, payload: &Bytes) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::CUT, &(cuts, init, payload))
}

/// `setCapabilities(ids, flags)`.
pub fn set_capabilities(ids: &[CapabilityId], flags: &[bool]) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::SET_CAPABILITIES, &(ids, flags))
}

/// `batchInvoke(requests)`. Each request travels in wire form.
pub fn batch_invoke(requests: &[Calldata]) -> Result<Calldata, ProxyError> {
    let wire: Vec<Bytes> = requests.iter().map(Calldata::to_bytes).collect();
    Calldata::encode(selectors::BATCH_INVOKE, &wire)
}

/// `transferPrincipal(new)`.
pub fn transfer_principal(new: Address) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::TRANSFER_PRINCIPAL, &new)
}

/// `currentPrincipal()`.
pub fn current_principal() -> Calldata {
    Calldata::bare(selectors::CURRENT_PRINCIPAL)
}

/// `supportsCapability(id)`.
pub fn supports_capability(id: CapabilityId) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::SUPPORTS_CAPABILITY, &id)
}

/// `modules()`.
pub fn modules() -> Calldata {
    Calldata::bare(selectors::MODULES)
}

/// `listModules()`.
pub fn list_modules() -> Calldata {
    Calldata::bare(selectors::LIST_MODULES)
}

/// `operationsOf(module)`.
pub fn operations_of(module: Address) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::OPERATIONS_OF, &module)
}

/// `moduleOf(op)`.
pub fn module_of(op: OperationCode) -> Result<Calldata, ProxyError> {
    Calldata::encode(selectors::MODULE_OF, &op)
}
