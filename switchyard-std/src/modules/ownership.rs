//! Governance principal read and transfer.
//!
//! Transferring to [`Address::DEAD`] is allowed. Combined with removing `cut`
//! from the registry it freezes the proxy for good.

use crate::selectors;
use switchyard_core::{
    Address, Bytes, CallContext, Calldata, Function, FunctionFlags, Interface, Module, ProxyError,
    ProxyEvent, codec,
};

/// `currentPrincipal()` and `transferPrincipal(address)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipModule;

impl Module for OwnershipModule {
    fn interface(&self) -> Interface {
        use selectors::signatures as sig;
        Interface::new([
            Function::new(
                sig::CURRENT_PRINCIPAL,
                selectors::CURRENT_PRINCIPAL,
                FunctionFlags::VIEW,
            ),
            Function::new(
                sig::TRANSFER_PRINCIPAL,
                selectors::TRANSFER_PRINCIPAL,
                FunctionFlags::PAYABLE,
            ),
        ])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        match input.selector() {
            selectors::CURRENT_PRINCIPAL => codec::encode(&ctx.governance().principal()),
            selectors::TRANSFER_PRINCIPAL => {
                let new: Address = input.decode()?;
                let caller = ctx.caller();
                let previous = ctx.state_mut().governance.transfer(caller, new)?;

                #[cfg(feature = "tracing")]
                tracing::debug!(%previous, %new, "ownership transfer staged");

                ctx.emit(ProxyEvent::OwnershipTransferred { previous, new });
                Ok(Bytes::new())
            }
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}
