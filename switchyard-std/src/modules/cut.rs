//! Registry mutation.
//!
//! `cut` applies every entry to the registry in order, records the change as
//! an event, and then runs the optional init step: a context-preserving call
//! to the init module with the init payload. Any failure, init included, fails
//! the whole top-level call, so a cut is never partially visible.

use crate::{calls::CutArgs, selectors};
use switchyard_core::{
    Address, Bytes, CallContext, Calldata, CapabilityId, Function, FunctionFlags, Interface,
    Module, ProxyError, ProxyEvent,
};

/// Governance-gated registry and capability writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutModule;

impl Module for CutModule {
    fn interface(&self) -> Interface {
        Interface::new([
            Function::new(selectors::signatures::CUT, selectors::CUT, FunctionFlags::PAYABLE),
            Function::new(
                selectors::signatures::SET_CAPABILITIES,
                selectors::SET_CAPABILITIES,
                FunctionFlags::PAYABLE,
            ),
        ])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        match input.selector() {
            selectors::CUT => cut(ctx, &input).await,
            selectors::SET_CAPABILITIES => set_capabilities(ctx, &input),
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}

async fn cut(ctx: &mut CallContext<'_>, input: &Calldata) -> Result<Bytes, ProxyError> {
    ctx.ensure_principal()?;
    let (cuts, init, payload): CutArgs = input.decode()?;

    ctx.state_mut().registry.apply_cut(&cuts)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(entries = cuts.len(), %init, "registry cut staged");

    ctx.emit(ProxyEvent::RegistryCut {
        cuts,
        init,
        init_payload: payload.clone(),
    });
    run_init(ctx, init, &payload).await?;
    Ok(Bytes::new())
}

async fn run_init(ctx: &mut CallContext<'_>, init: Address, payload: &Bytes) -> Result<(), ProxyError> {
    if init.is_zero() {
        return Ok(());
    }
    if !ctx.host().has_code(init) {
        return Err(ProxyError::NotAContract(init));
    }

    match ctx.delegate(init, Calldata::from_bytes(payload)).await {
        Ok(_) => Ok(()),
        Err(ProxyError::RevertWithoutReason) => Err(ProxyError::InitFailed { module: init }),
        Err(reason) => Err(ProxyError::InitReverted {
            module: init,
            reason: Box::new(reason),
        }),
    }
}

fn set_capabilities(ctx: &mut CallContext<'_>, input: &Calldata) -> Result<Bytes, ProxyError> {
    ctx.ensure_principal()?;
    let (ids, flags): (Vec<CapabilityId>, Vec<bool>) = input.decode()?;

    ctx.state_mut().flags.set_many(&ids, &flags)?;
    for (id, supported) in ids.into_iter().zip(flags) {
        #[cfg(feature = "tracing")]
        tracing::debug!(%id, supported, "capability update staged");
        ctx.emit(ProxyEvent::CapabilityUpdated { id, supported });
    }
    Ok(Bytes::new())
}
