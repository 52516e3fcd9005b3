//! # switchyard-core
//!
//! Core types and traits for the Switchyard dynamic dispatch proxy.
//!
//! A proxy is a single long-lived entity that forwards operation requests to
//! pluggable, independently deployed modules while keeping all persistent
//! state to itself. This crate holds the pieces every module author needs and
//! nothing that decides policy:
//!
//! - **Identifiers**: [`OperationCode`], [`CapabilityId`], [`Address`]
//! - **Modules**: the [`Module`] trait, its object-safe twin [`DynModule`], and
//!   the [`Interface`] a module advertises
//! - **State**: [`ModuleRegistry`], [`CapabilityFlags`], [`Governance`],
//!   [`Storage`], bundled as [`ProxyState`]
//! - **Host**: [`ModuleHost`], the table of deployed code
//! - **Dispatcher**: [`CallContext`], which runs module code against the
//!   proxy's state
//!
//! The proxy itself, the batch invoker and the standard modules live in
//! `switchyard-std`.
//!
//! # Error Types
//!
//! - [`ProxyError`] - every failure condition, one variant per condition code
//! - [`ErrorKind`] - the coarse taxonomy those codes fall into

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod call;
pub mod codec;
mod context;
mod error;
mod event;
mod flags;
mod governance;
mod host;
mod id;
mod module;
mod registry;
mod state;
mod storage;

// Re-exports
pub use bytes::Bytes;
pub use call::{Calldata, Receipt};
pub use context::{CallContext, MAX_CALL_DEPTH};
pub use error::{BoxError, ErrorKind, ProxyError};
pub use event::{CutAction, ModuleCut, ProxyEvent};
pub use flags::CapabilityFlags;
pub use governance::Governance;
pub use host::ModuleHost;
pub use id::{Address, CapabilityId, OperationCode};
pub use module::{DynModule, Function, FunctionFlags, Interface, InterfaceBuilder, Module};
pub use registry::{ModuleRegistry, RegistryEntry};
pub use state::ProxyState;
pub use storage::Storage;
