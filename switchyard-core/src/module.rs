//! # Modules
//!
//! A module is an independently deployed unit of logic that the proxy routes
//! operations to. Modules own no registry state: every invocation receives a
//! [`CallContext`] that reads and writes the *proxy's* state, which is how a
//! module can be replaced without losing anything the proxy has accumulated.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Module`] uses native `async fn` for zero-cost static dispatch.
//! The host stores modules as `Arc<dyn DynModule>`; every `Module` is a
//! [`DynModule`] through a blanket implementation.
//!
//! # Interfaces
//!
//! A module describes the operations it implements with an [`Interface`]. The
//! interface is what deployment code cuts into the registry, and it tells the
//! dispatcher which operations accept attached value.

use crate::{
    call::Calldata,
    context::CallContext,
    error::ProxyError,
    id::{CapabilityId, OperationCode},
};
use bitflags::bitflags;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::future::Future;

bitflags! {
    /// Attributes of a single operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u8 {
        /// Accepts a nonzero attached value.
        const PAYABLE = 1 << 0;
        /// Does not mutate proxy state.
        const VIEW = 1 << 1;
    }
}

/// One operation of a module interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    signature: &'static str,
    selector: OperationCode,
    flags: FunctionFlags,
}

impl Function {
    /// A function whose selector was derived ahead of time, typically with
    /// the `selector!` macro.
    pub const fn new(signature: &'static str, selector: OperationCode, flags: FunctionFlags) -> Self {
        Self {
            signature,
            selector,
            flags,
        }
    }

    /// The canonical signature, e.g. `transferPrincipal(address)`.
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// The derived operation code.
    pub fn selector(&self) -> OperationCode {
        self.selector
    }

    /// The attribute flags.
    pub fn flags(&self) -> FunctionFlags {
        self.flags
    }

    /// Whether nonzero value may be attached.
    pub fn is_payable(&self) -> bool {
        self.flags.contains(FunctionFlags::PAYABLE)
    }
}

/// The set of operations a module implements.
///
/// # Example
///
/// ```rust,ignore
/// let iface = Interface::builder()
///     .payable("increment()")
///     .view("count()")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    functions: Vec<Function>,
}

impl Interface {
    /// An interface from pre-derived functions.
    pub fn new(functions: impl Into<Vec<Function>>) -> Self {
        Self {
            functions: functions.into(),
        }
    }

    /// Start building an interface.
    pub fn builder() -> InterfaceBuilder {
        InterfaceBuilder::default()
    }

    /// All functions, in declaration order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Look up a function by operation code.
    pub fn function(&self, selector: OperationCode) -> Option<&Function> {
        self.functions.iter().find(|f| f.selector == selector)
    }

    /// Every operation code of the interface.
    pub fn selectors(&self) -> Vec<OperationCode> {
        self.functions.iter().map(|f| f.selector).collect()
    }

    /// The operation codes of the named signatures only.
    pub fn only(&self, signatures: &[&str]) -> Vec<OperationCode> {
        self.functions
            .iter()
            .filter(|f| signatures.contains(&f.signature))
            .map(|f| f.selector)
            .collect()
    }

    /// Every operation code except the named signatures.
    pub fn without(&self, signatures: &[&str]) -> Vec<OperationCode> {
        self.functions
            .iter()
            .filter(|f| !signatures.contains(&f.signature))
            .map(|f| f.selector)
            .collect()
    }

    /// The capability id of this interface (XOR of all operation codes).
    pub fn capability_id(&self) -> CapabilityId {
        CapabilityId::of_operations(self.functions.iter().map(|f| f.selector))
    }

    /// Number of functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the interface declares nothing.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Builder for [`Interface`].
#[derive(Debug, Default)]
pub struct InterfaceBuilder {
    entries: Vec<(&'static str, FunctionFlags)>,
}

impl InterfaceBuilder {
    /// Declare a function with explicit flags.
    pub fn function(mut self, signature: &'static str, flags: FunctionFlags) -> Self {
        self.entries.push((signature, flags));
        self
    }

    /// Declare a payable, state-changing function.
    pub fn payable(self, signature: &'static str) -> Self {
        self.function(signature, FunctionFlags::PAYABLE)
    }

    /// Declare a non-payable, state-changing function.
    pub fn nonpayable(self, signature: &'static str) -> Self {
        self.function(signature, FunctionFlags::empty())
    }

    /// Declare a non-payable view function.
    pub fn view(self, signature: &'static str) -> Self {
        self.function(signature, FunctionFlags::VIEW)
    }

    /// Derive every operation code and build the interface.
    ///
    /// Fails on a malformed signature or when two signatures collide.
    pub fn build(self) -> Result<Interface, ProxyError> {
        let mut functions: Vec<Function> = Vec::with_capacity(self.entries.len());
        for (signature, flags) in self.entries {
            let selector = OperationCode::of(signature)?;
            if functions.iter().any(|f| f.selector == selector) {
                return Err(ProxyError::AddFunctionDuplicate(selector));
            }
            functions.push(Function {
                signature,
                selector,
                flags,
            });
        }
        Ok(Interface { functions })
    }
}

/// An implementation module.
///
/// # Example
///
/// ```rust,ignore
/// struct Greeter;
///
/// impl Module for Greeter {
///     fn interface(&self) -> Interface {
///         Interface::builder().view("greet()").build().unwrap_or_default()
///     }
///
///     async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
///         Ok(Bytes::from_static(b"hello"))
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Module`",
    label = "missing `Module` implementation",
    note = "Modules must implement `interface` and `invoke`."
)]
pub trait Module: Send + Sync + 'static {
    /// The operations this module implements.
    fn interface(&self) -> Interface;

    /// Execute one operation against the proxy's state.
    fn invoke(
        &self,
        ctx: &mut CallContext<'_>,
        input: Calldata,
    ) -> impl Future<Output = Result<Bytes, ProxyError>> + Send;
}

/// Dynamic object-safe version of [`Module`].
pub trait DynModule: Send + Sync + 'static {
    /// The operations this module implements (dynamic dispatch version).
    fn interface_dyn(&self) -> Interface;

    /// Execute one operation (dynamic dispatch version).
    fn invoke_dyn<'a>(
        &'a self,
        ctx: &'a mut CallContext<'_>,
        input: Calldata,
    ) -> BoxFuture<'a, Result<Bytes, ProxyError>>;

    /// Whether `selector` may be invoked with nonzero value. Operations the
    /// interface does not list are fallbacks and accept value.
    fn accepts_value(&self, selector: OperationCode) -> bool {
        self.interface_dyn()
            .function(selector)
            .is_none_or(Function::is_payable)
    }
}

// Blanket implementation: any Module is a DynModule.
impl<M: Module> DynModule for M {
    fn interface_dyn(&self) -> Interface {
        self.interface()
    }

    fn invoke_dyn<'a>(
        &'a self,
        ctx: &'a mut CallContext<'_>,
        input: Calldata,
    ) -> BoxFuture<'a, Result<Bytes, ProxyError>> {
        Box::pin(self.invoke(ctx, input))
    }
}
