//! # switchyard - Dynamic Dispatch Proxy
//!
//! `switchyard` is a proxy that forwards operation requests to pluggable,
//! independently deployed modules while keeping all persistent state to
//! itself. Modules are added, replaced or removed at runtime by a governance
//! principal through an atomic *cut*, without losing anything the proxy has
//! accumulated.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchyard::prelude::*;
//! use switchyard::testing::CounterModule;
//!
//! let host = Arc::new(ModuleHost::new());
//! let owner = Address::derive("owner");
//! let mut proxy = Proxy::builder(host.clone()).owner(owner).standard().build().await?;
//!
//! let counter = host.deploy(CounterModule);
//! proxy
//!     .cut(owner, &[ModuleCut::add(counter, CounterModule.interface().selectors())], Address::ZERO, Bytes::new())
//!     .await?;
//!
//! let receipt = proxy.call(owner, Calldata::bare(CounterModule::INCREMENT), 0).await?;
//! assert_eq!(receipt.decode::<u64>()?, 1);
//! ```
//!
//! ## Atomicity
//!
//! Every top-level call runs against a staged copy of the proxy's state. The
//! copy is committed only when the whole call tree (nested dispatches, batch
//! sub-requests, a cut's init step) succeeded; otherwise it is dropped and
//! the call leaves no trace.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use switchyard_core::{
    // Identifiers
    Address,
    // Errors
    BoxError,
    Bytes,
    // Dispatcher
    CallContext,
    // Wire
    Calldata,
    CapabilityFlags,
    CapabilityId,
    CutAction,
    // Modules
    DynModule,
    ErrorKind,
    Function,
    FunctionFlags,
    Governance,
    Interface,
    InterfaceBuilder,
    MAX_CALL_DEPTH,
    Module,
    ModuleCut,
    // Host
    ModuleHost,
    // State
    ModuleRegistry,
    OperationCode,
    ProxyError,
    // Events
    ProxyEvent,
    ProxyState,
    Receipt,
    RegistryEntry,
    Storage,
    codec,
};

pub use switchyard_std::{
    BatchInvoker, CutModule, IntrospectionModule, OwnershipModule, Proxy, ProxyBuilder,
    TracedModule, calls, selectors,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::testing::*;
}

/// Prelude module - common imports for Switchyard.
///
/// # Usage
///
/// ```rust,ignore
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Address, Bytes, CallContext, Calldata, CapabilityId, Interface, Module, ModuleCut,
        ModuleHost, OperationCode, Proxy, ProxyError, ProxyEvent, Receipt,
    };

    #[cfg(feature = "macros")]
    pub use crate::selector;
}

#[cfg(feature = "macros")]
pub use switchyard_macros::{capability, selector};
