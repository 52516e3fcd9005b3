//! # switchyard-std
//!
//! The runnable proxy built on `switchyard-core`.
//!
//! This crate provides:
//! - **Proxy**: [`Proxy`], the transaction boundary that stages and commits
//!   every top-level call, configured through [`ProxyBuilder`]
//! - **Built-in code**: [`BatchInvoker`], bound immutably to the proxy itself
//! - **Standard modules**: [`CutModule`], [`IntrospectionModule`],
//!   [`OwnershipModule`]
//! - **Wire helpers**: [`selectors`] and typed [`calls`]
//! - **Observability**: [`TracedModule`] (with the `tracing` feature)
//! - **Testing**: small modules in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use switchyard_core;

mod batch;
mod builder;
pub mod calls;
pub mod modules;
mod proxy;
pub mod selectors;
pub mod testing;
mod traced;

pub use batch::BatchInvoker;
pub use builder::ProxyBuilder;
pub use modules::{CutModule, IntrospectionModule, OwnershipModule};
pub use proxy::Proxy;
pub use traced::TracedModule;
