//! The proxy's built-in code: the batch invoker.
//!
//! `batchInvoke(bytes[])` is bound to the proxy's own address at construction,
//! which makes it immutable. Each request is dispatched in order through the
//! same context, so the caller and the attached value are preserved for every
//! sub-request. The first failure aborts the batch with that failure's own
//! reason; since the enclosing top-level call runs on a staged state, nothing
//! an earlier sub-request did survives.

use crate::selectors;
use switchyard_core::{
    Bytes, CallContext, Calldata, Function, FunctionFlags, Interface, Module, ProxyError, codec,
};

/// Runs a list of requests atomically.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchInvoker;

impl Module for BatchInvoker {
    fn interface(&self) -> Interface {
        Interface::new([Function::new(
            selectors::signatures::BATCH_INVOKE,
            selectors::BATCH_INVOKE,
            FunctionFlags::PAYABLE,
        )])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        if input.selector() != selectors::BATCH_INVOKE {
            return Err(ProxyError::FunctionDoesNotExist(input.selector()));
        }

        let requests: Vec<Bytes> = input.decode()?;
        let mut results = Vec::with_capacity(requests.len());
        for (index, raw) in requests.iter().enumerate() {
            let request = Calldata::from_bytes(raw);
            #[cfg(feature = "tracing")]
            tracing::debug!(index, selector = %request.selector(), "batch request");
            #[cfg(not(feature = "tracing"))]
            let _ = index;

            results.push(ctx.dispatch(request).await?);
        }
        codec::encode(&results)
    }
}
