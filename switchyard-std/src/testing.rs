//! Testing utilities for Switchyard.
//!
//! Small modules with predictable behavior, for exercising the proxy in
//! tests.
//!
//! - [`CounterModule`]: bumps a counter in shared storage
//! - [`RevertModule`]: always fails, with or without a reason
//! - [`InitModule`]: a cut init target that records it ran
//! - [`FallbackModule`]: accepts any operation
//! - [`RecordingModule`]: records every call it receives

use parking_lot::Mutex;
use std::sync::Arc;
use switchyard_core::{
    Address, Bytes, CallContext, Calldata, Function, FunctionFlags, Interface, Module,
    OperationCode, ProxyError, Storage, codec,
};
use switchyard_macros::selector;

// ============================================================================
// Counter
// ============================================================================

/// A counter kept in the proxy's storage.
///
/// | Operation | Flags |
/// |-----------|-------|
/// | `increment()` | payable |
/// | `incrementBy(uint64)` | payable |
/// | `reset()` | non-payable |
/// | `count()` | view |
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterModule;

impl CounterModule {
    /// `increment()`
    pub const INCREMENT: OperationCode = selector!("increment()");
    /// `incrementBy(uint64)`
    pub const INCREMENT_BY: OperationCode = selector!("incrementBy(uint64)");
    /// `reset()`
    pub const RESET: OperationCode = selector!("reset()");
    /// `count()`
    pub const COUNT: OperationCode = selector!("count()");

    const NAMESPACE: &'static str = "counter";
    const KEY: &'static [u8] = b"count";

    /// The counter as stored in `storage`.
    pub fn read(storage: &Storage) -> Result<u64, ProxyError> {
        Ok(storage.load(Self::NAMESPACE, Self::KEY)?.unwrap_or(0))
    }

    /// Calldata for `incrementBy(amount)`.
    pub fn increment_by(amount: u64) -> Result<Calldata, ProxyError> {
        Calldata::encode(Self::INCREMENT_BY, &amount)
    }

    fn bump(ctx: &mut CallContext<'_>, amount: u64) -> Result<Bytes, ProxyError> {
        let next = Self::read(ctx.storage())?
            .checked_add(amount)
            .ok_or_else(|| ProxyError::revert("counter overflow"))?;
        ctx.storage_mut().store(Self::NAMESPACE, Self::KEY, &next)?;
        let encoded = codec::encode(&next)?;
        ctx.log("Incremented", encoded.clone());
        Ok(encoded)
    }
}

impl Module for CounterModule {
    fn interface(&self) -> Interface {
        Interface::new([
            Function::new("increment()", Self::INCREMENT, FunctionFlags::PAYABLE),
            Function::new("incrementBy(uint64)", Self::INCREMENT_BY, FunctionFlags::PAYABLE),
            Function::new("reset()", Self::RESET, FunctionFlags::empty()),
            Function::new("count()", Self::COUNT, FunctionFlags::VIEW),
        ])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        match input.selector() {
            Self::INCREMENT => Self::bump(ctx, 1),
            Self::INCREMENT_BY => {
                let amount: u64 = input.decode()?;
                Self::bump(ctx, amount)
            }
            Self::RESET => {
                ctx.storage_mut().remove(Self::NAMESPACE, Self::KEY);
                Ok(Bytes::new())
            }
            Self::COUNT => codec::encode(&Self::read(ctx.storage())?),
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}

// ============================================================================
// Revert
// ============================================================================

/// Fails every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevertModule;

impl RevertModule {
    /// `fail()`: fails with [`RevertModule::REASON`].
    pub const FAIL: OperationCode = selector!("fail()");
    /// `failSilently()`: fails without a reason.
    pub const FAIL_SILENTLY: OperationCode = selector!("failSilently()");
    /// The reason `fail()` gives.
    pub const REASON: &'static str = "RevertModule call failed";
}

impl Module for RevertModule {
    fn interface(&self) -> Interface {
        Interface::new([
            Function::new("fail()", Self::FAIL, FunctionFlags::PAYABLE),
            Function::new("failSilently()", Self::FAIL_SILENTLY, FunctionFlags::PAYABLE),
        ])
    }

    async fn invoke(&self, _ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        match input.selector() {
            Self::FAIL => Err(ProxyError::revert(Self::REASON)),
            Self::FAIL_SILENTLY => Err(ProxyError::RevertWithoutReason),
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}

// ============================================================================
// Init
// ============================================================================

/// A cut init target.
///
/// `init()` marks the proxy initialized and remembers who ran the cut;
/// `initCounter(uint64)` seeds [`CounterModule`]'s storage, showing that
/// init code writes the proxy's state.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitModule;

impl InitModule {
    /// `init()`
    pub const INIT: OperationCode = selector!("init()");
    /// `initCounter(uint64)`
    pub const INIT_COUNTER: OperationCode = selector!("initCounter(uint64)");
    /// `initialized()`
    pub const INITIALIZED: OperationCode = selector!("initialized()");

    const NAMESPACE: &'static str = "init";

    /// The principal that ran `init()`, if it ran.
    pub fn initialized_by(storage: &Storage) -> Result<Option<Address>, ProxyError> {
        storage.load(Self::NAMESPACE, b"by")
    }
}

impl Module for InitModule {
    fn interface(&self) -> Interface {
        Interface::new([
            Function::new("init()", Self::INIT, FunctionFlags::PAYABLE),
            Function::new("initCounter(uint64)", Self::INIT_COUNTER, FunctionFlags::PAYABLE),
            Function::new("initialized()", Self::INITIALIZED, FunctionFlags::VIEW),
        ])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        match input.selector() {
            Self::INIT => {
                let caller = ctx.caller();
                ctx.storage_mut().store(Self::NAMESPACE, &b"by"[..], &caller)?;
                ctx.log("Initialized", codec::encode(&caller)?);
                Ok(Bytes::new())
            }
            Self::INIT_COUNTER => {
                let start: u64 = input.decode()?;
                ctx.storage_mut()
                    .store(CounterModule::NAMESPACE, CounterModule::KEY, &start)?;
                Ok(Bytes::new())
            }
            Self::INITIALIZED => codec::encode(&Self::initialized_by(ctx.storage())?.is_some()),
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// Declares nothing and answers everything by echoing the operation code.
/// Every operation it serves accepts value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackModule;

impl Module for FallbackModule {
    fn interface(&self) -> Interface {
        Interface::default()
    }

    async fn invoke(&self, _ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        Ok(Bytes::copy_from_slice(&input.selector().to_bytes()))
    }
}

// ============================================================================
// Recording
// ============================================================================

/// One call seen by a [`RecordingModule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The operation.
    pub selector: OperationCode,
    /// Encoded arguments.
    pub args: Bytes,
    /// The preserved top-level caller.
    pub caller: Address,
    /// The preserved attached value.
    pub value: u128,
    /// Whose state the call ran against.
    pub this: Address,
}

/// Serves a caller-supplied interface and records every call.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingModule::new(iface);
/// let address = host.deploy(recorder.clone());
///
/// // Cut it in and call it...
///
/// assert_eq!(recorder.calls().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingModule {
    interface: Interface,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingModule {
    /// Record calls to the operations of `interface`.
    pub fn new(interface: Interface) -> Self {
        Self {
            interface,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Module for RecordingModule {
    fn interface(&self) -> Interface {
        self.interface.clone()
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        self.calls.lock().push(RecordedCall {
            selector: input.selector(),
            args: input.args().clone(),
            caller: ctx.caller(),
            value: ctx.value(),
            this: ctx.this(),
        });
        Ok(Bytes::new())
    }
}
