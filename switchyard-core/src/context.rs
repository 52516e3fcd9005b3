//! # Dispatcher
//!
//! [`CallContext`] is what a module sees while it runs: the proxy's state, the
//! host, the external caller and the attached value. Running a module through
//! a context is the context-preserving invocation: the module's code executes,
//! but every read and write lands in the proxy's state.
//!
//! Two entry points run code:
//!
//! - [`CallContext::dispatch`] resolves the operation code through the
//!   registry and fails with [`ProxyError::FunctionDoesNotExist`] if nothing
//!   is bound to it.
//! - [`CallContext::delegate`] runs the module at an explicit address (used
//!   for a cut's init step).
//!
//! Both preserve the caller and the value, and both propagate the module's
//! error unchanged. Nested invocations are boxed futures so modules can call
//! back into the dispatcher. Nesting is bounded by [`MAX_CALL_DEPTH`]: the
//! invocation that would exceed it fails with
//! [`ProxyError::CallDepthExceeded`] instead of growing the stack.

use crate::{
    call::Calldata,
    error::ProxyError,
    event::ProxyEvent,
    flags::CapabilityFlags,
    governance::Governance,
    host::ModuleHost,
    id::Address,
    registry::ModuleRegistry,
    state::ProxyState,
    storage::Storage,
};
use bytes::Bytes;
use futures::future::BoxFuture;

/// How many module invocations may be active at once within one top-level call.
pub const MAX_CALL_DEPTH: usize = 128;

/// The execution context of one invocation.
pub struct CallContext<'a> {
    state: &'a mut ProxyState,
    host: &'a ModuleHost,
    caller: Address,
    value: u128,
    code: Address,
    depth: usize,
}

impl<'a> CallContext<'a> {
    /// A context for a call from `caller` carrying `value`.
    pub fn new(
        state: &'a mut ProxyState,
        host: &'a ModuleHost,
        caller: Address,
        value: u128,
    ) -> Self {
        let code = state.address();
        Self {
            state,
            host,
            caller,
            value,
            code,
            depth: 0,
        }
    }

    /// Who made the top-level call. Preserved across nested invocations.
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// The attached value. Preserved across nested invocations.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// The proxy's address.
    pub fn this(&self) -> Address {
        self.state.address()
    }

    /// The module whose code is currently running.
    pub fn code_address(&self) -> Address {
        self.code
    }

    /// How many module invocations are currently active, this one included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The host.
    pub fn host(&self) -> &ModuleHost {
        self.host
    }

    /// Read access to the whole state.
    pub fn state(&self) -> &ProxyState {
        self.state
    }

    /// Write access to the whole state.
    pub fn state_mut(&mut self) -> &mut ProxyState {
        self.state
    }

    /// The routing table.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.state.registry
    }

    /// The capability flags.
    pub fn flags(&self) -> &CapabilityFlags {
        &self.state.flags
    }

    /// The governance guard.
    pub fn governance(&self) -> &Governance {
        &self.state.governance
    }

    /// Shared business storage.
    pub fn storage(&self) -> &Storage {
        &self.state.storage
    }

    /// Shared business storage, writable.
    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.state.storage
    }

    /// Fail unless the caller is the governance principal.
    pub fn ensure_principal(&self) -> Result<(), ProxyError> {
        self.state.governance.ensure(self.caller)
    }

    /// Queue an event.
    pub fn emit(&mut self, event: ProxyEvent) {
        self.state.emit(event);
    }

    /// Queue a module log line, attributed to the running module.
    pub fn log(&mut self, topic: impl Into<String>, data: impl Into<Bytes>) {
        let emitter = self.code;
        self.state.emit(ProxyEvent::Log {
            emitter,
            topic: topic.into(),
            data: data.into(),
        });
    }

    /// Resolve `input`'s operation code and run the bound module.
    pub fn dispatch(&mut self, input: Calldata) -> BoxFuture<'_, Result<Bytes, ProxyError>> {
        Box::pin(async move {
            let selector = input.selector();
            let target = self
                .state
                .registry
                .resolve(selector)
                .ok_or(ProxyError::FunctionDoesNotExist(selector))?;
            self.delegate(target, input).await
        })
    }

    /// Run the module deployed at `target` against this context.
    pub fn delegate(
        &mut self,
        target: Address,
        input: Calldata,
    ) -> BoxFuture<'_, Result<Bytes, ProxyError>> {
        Box::pin(async move {
            if self.depth >= MAX_CALL_DEPTH {
                return Err(ProxyError::CallDepthExceeded {
                    limit: MAX_CALL_DEPTH,
                });
            }
            let module = self
                .host
                .code_at(target)
                .ok_or(ProxyError::NotAContract(target))?;
            if self.value > 0 && !module.accepts_value(input.selector()) {
                return Err(ProxyError::NonPayable(input.selector()));
            }

            let outer = std::mem::replace(&mut self.code, target);
            self.depth += 1;
            let result = module.invoke_dyn(self, input).await;
            self.depth -= 1;
            self.code = outer;
            result
        })
    }
}
