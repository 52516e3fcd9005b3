//! Tracing instrumentation for modules.

use switchyard_core::{Bytes, CallContext, Calldata, Interface, Module, ProxyError};

/// A module wrapper that instruments every invocation with a `tracing` span.
///
/// The span carries the wrapper's name, the selector, the preserved caller and
/// the attached value; failures are logged at debug level inside it. Without
/// the `tracing` feature the wrapper is transparent.
pub struct TracedModule<M> {
    inner: M,
    name: &'static str,
}

impl<M> TracedModule<M> {
    /// Create a new `TracedModule` wrapper around a module.
    pub const fn new(inner: M, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The wrapped module.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: Clone> Clone for TracedModule<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<M: Copy> Copy for TracedModule<M> {}

#[cfg(feature = "tracing")]
use tracing::Instrument;

impl<M: Module> Module for TracedModule<M> {
    fn interface(&self) -> Interface {
        self.inner.interface()
    }

    #[cfg(feature = "tracing")]
    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        let span = tracing::info_span!(
            "module_call",
            module = %self.name,
            selector = %input.selector(),
            caller = %ctx.caller(),
            value = ctx.value(),
        );

        async move {
            let result = self.inner.invoke(ctx, input).await;
            if let Err(err) = &result {
                tracing::debug!(error = %err, "module call failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    #[cfg(not(feature = "tracing"))]
    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        self.inner.invoke(ctx, input).await
    }
}
