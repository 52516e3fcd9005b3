//! Observable events.
//!
//! Events are staged with the rest of the proxy state and only become visible
//! when the top-level call that emitted them commits.

use crate::id::{Address, CapabilityId, OperationCode};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// What a single cut entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutAction {
    /// Bind new operations to a module.
    Add,
    /// Rebind existing operations to a different module.
    Replace,
    /// Unbind operations.
    Remove,
}

/// One entry of a cut: an action applied to a set of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCut {
    /// Target module. Must be [`Address::ZERO`] for removals.
    pub module: Address,
    /// The action.
    pub action: CutAction,
    /// The operations the action applies to.
    pub selectors: Vec<OperationCode>,
}

impl ModuleCut {
    /// Add `selectors` to `module`.
    pub fn add(module: Address, selectors: impl Into<Vec<OperationCode>>) -> Self {
        Self {
            module,
            action: CutAction::Add,
            selectors: selectors.into(),
        }
    }

    /// Rebind `selectors` to `module`.
    pub fn replace(module: Address, selectors: impl Into<Vec<OperationCode>>) -> Self {
        Self {
            module,
            action: CutAction::Replace,
            selectors: selectors.into(),
        }
    }

    /// Remove `selectors`.
    pub fn remove(selectors: impl Into<Vec<OperationCode>>) -> Self {
        Self {
            module: Address::ZERO,
            action: CutAction::Remove,
            selectors: selectors.into(),
        }
    }
}

/// An event emitted by a committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyEvent {
    /// The registry was changed by a cut.
    RegistryCut {
        /// Every entry of the cut, as submitted.
        cuts: Vec<ModuleCut>,
        /// The init module, or zero.
        init: Address,
        /// The init payload.
        init_payload: Bytes,
    },
    /// The governance principal changed.
    OwnershipTransferred {
        /// The previous principal.
        previous: Address,
        /// The new principal.
        new: Address,
    },
    /// A capability flag was written.
    CapabilityUpdated {
        /// The capability.
        id: CapabilityId,
        /// Its new value.
        supported: bool,
    },
    /// A log line emitted by a module.
    Log {
        /// The module whose code emitted it.
        emitter: Address,
        /// Short event name.
        topic: String,
        /// Encoded event data.
        data: Bytes,
    },
}
