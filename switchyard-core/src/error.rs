//! Error types for Switchyard.
//!
//! Every failure of a top-level call is a [`ProxyError`]. Each variant is a
//! condition code a caller can match on; [`ProxyError::kind`] groups them into
//! the coarse [`ErrorKind`] taxonomy.
//!
//! Any error aborts the whole enclosing top-level call. There is no local
//! recovery and nothing is retried.

use crate::id::{Address, OperationCode};
use thiserror::Error;

/// A boxed error type for modules that wrap foreign errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every condition a proxy call can fail with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The caller is not the governance principal.
    #[error("caller {caller} is not the contract owner")]
    NotContractOwner {
        /// Who attempted the call.
        caller: Address,
    },

    /// A cut entry carried an empty operation set.
    #[error("no selectors to cut")]
    NoSelectorsToCut,

    /// A zero address was supplied where a module or owner was required.
    #[error("zero address")]
    AddressZero,

    /// The target has no deployed code.
    #[error("{0} is not a contract")]
    NotAContract(Address),

    /// Parallel arrays of different lengths.
    #[error("length mismatch: {ids} ids, {flags} flags")]
    LengthMismatch {
        /// Number of capability ids.
        ids: usize,
        /// Number of flags.
        flags: usize,
    },

    /// Add of an operation that is already registered.
    #[error("function {0} already exists")]
    AddFunctionDuplicate(OperationCode),

    /// Replace of an operation with the module it is already bound to.
    #[error("function {0} is already bound to that module")]
    ReplaceFunctionSame(OperationCode),

    /// Remove or replace of an operation bound to the proxy's built-in code.
    #[error("function {0} is immutable")]
    RemoveFunctionImmutable(OperationCode),

    /// Remove or replace of an operation that is not registered.
    #[error("function {0} does not exist")]
    RemoveFunctionDoesNotExist(OperationCode),

    /// Dispatch of an operation that is not registered.
    #[error("function {0} does not exist")]
    FunctionDoesNotExist(OperationCode),

    /// Value attached to an operation that does not accept it.
    #[error("function {0} is not payable")]
    NonPayable(OperationCode),

    /// The init module of a cut failed with an explicit reason. Displays as the
    /// reason itself.
    #[error("{reason}")]
    InitReverted {
        /// The init module that failed.
        module: Address,
        /// Its failure.
        reason: Box<ProxyError>,
    },

    /// The init module of a cut failed without a reason.
    #[error("init func failed")]
    InitFailed {
        /// The init module that failed.
        module: Address,
    },

    /// A module failed with an explicit reason.
    #[error("{0}")]
    Revert(String),

    /// A module failed without giving a reason.
    #[error("failed delegatecall")]
    RevertWithoutReason,

    /// Module invocations nested deeper than the dispatcher allows.
    #[error("call depth exceeds {limit}")]
    CallDepthExceeded {
        /// The maximum number of nested invocations.
        limit: usize,
    },

    /// A payload could not be decoded.
    #[error("malformed payload: {0}")]
    Decode(String),

    /// An internal registry invariant does not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Coarse classification of [`ProxyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller is not allowed to do this.
    AccessDenied,
    /// The input is malformed or incomplete.
    Validation,
    /// The input conflicts with the current registry.
    Conflict,
    /// The named operation does not exist.
    NotFound,
    /// A module's own invocation failed.
    Downstream,
    /// Internal consistency failure.
    Invariant,
}

impl ProxyError {
    /// Shorthand for [`ProxyError::Revert`].
    pub fn revert(reason: impl Into<String>) -> Self {
        ProxyError::Revert(reason.into())
    }

    /// The taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::NotContractOwner { .. } => ErrorKind::AccessDenied,
            ProxyError::NoSelectorsToCut
            | ProxyError::AddressZero
            | ProxyError::NotAContract(_)
            | ProxyError::LengthMismatch { .. }
            | ProxyError::NonPayable(_)
            | ProxyError::CallDepthExceeded { .. }
            | ProxyError::Decode(_) => ErrorKind::Validation,
            ProxyError::AddFunctionDuplicate(_)
            | ProxyError::ReplaceFunctionSame(_)
            | ProxyError::RemoveFunctionImmutable(_) => ErrorKind::Conflict,
            ProxyError::RemoveFunctionDoesNotExist(_) | ProxyError::FunctionDoesNotExist(_) => {
                ErrorKind::NotFound
            }
            ProxyError::InitReverted { .. }
            | ProxyError::InitFailed { .. }
            | ProxyError::Revert(_)
            | ProxyError::RevertWithoutReason => ErrorKind::Downstream,
            ProxyError::Invariant(_) => ErrorKind::Invariant,
        }
    }
}

impl From<postcard::Error> for ProxyError {
    fn from(err: postcard::Error) -> Self {
        ProxyError::Decode(err.to_string())
    }
}

impl From<BoxError> for ProxyError {
    fn from(err: BoxError) -> Self {
        ProxyError::Revert(err.to_string())
    }
}
