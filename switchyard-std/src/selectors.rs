//! Operation codes and capability ids of the standard surface.
//!
//! Each constant is derived at compile time from its canonical signature; the
//! signature text itself is kept in [`signatures`] under the same name.

use switchyard_core::{CapabilityId, OperationCode};
use switchyard_macros::{capability, selector};

macro_rules! operations {
    ($($(#[$doc:meta])* $name:ident => $sig:tt;)*) => {
        $(
            $(#[$doc])*
            pub const $name: OperationCode = selector!($sig);
        )*

        /// Canonical signatures, keyed like the operation codes.
        pub mod signatures {
            $(
                #[allow(missing_docs)]
                pub const $name: &str = $sig;
            )*
        }
    };
}

operations! {
    /// Apply a batch of registry mutations, then an optional init call.
    CUT => "cut((address,uint8,bytes4[])[],address,bytes)";
    /// Write a batch of capability flags.
    SET_CAPABILITIES => "setCapabilities(bytes4[],bool[])";
    /// Dispatch an ordered list of requests atomically.
    BATCH_INVOKE => "batchInvoke(bytes[])";
    /// Every module with its operations.
    MODULES => "modules()";
    /// Operations routed to one module.
    OPERATIONS_OF => "operationsOf(address)";
    /// Distinct module addresses.
    LIST_MODULES => "listModules()";
    /// The module an operation is routed to.
    MODULE_OF => "moduleOf(bytes4)";
    /// Capability flag query.
    SUPPORTS_CAPABILITY => "supportsCapability(bytes4)";
    /// The governance principal.
    CURRENT_PRINCIPAL => "currentPrincipal()";
    /// Hand governance to another address.
    TRANSFER_PRINCIPAL => "transferPrincipal(address)";
}

/// The capability query itself.
pub const CAPABILITY_QUERY: CapabilityId = capability!("supportsCapability(bytes4)");

/// Registry mutation.
pub const CUT_CAPABILITY: CapabilityId =
    capability!("cut((address,uint8,bytes4[])[],address,bytes)");

/// Registry introspection.
pub const INTROSPECTION_CAPABILITY: CapabilityId = capability!(
    "modules()",
    "operationsOf(address)",
    "listModules()",
    "moduleOf(bytes4)",
);

/// Governance ownership.
pub const OWNERSHIP_CAPABILITY: CapabilityId =
    capability!("currentPrincipal()", "transferPrincipal(address)");
