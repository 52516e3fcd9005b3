//! Standard modules.
//!
//! - [`CutModule`]: registry mutation and capability flag writes
//! - [`IntrospectionModule`]: read views over the registry and the flags
//! - [`OwnershipModule`]: the governance principal

mod cut;
mod introspection;
mod ownership;

pub use cut::CutModule;
pub use introspection::IntrospectionModule;
pub use ownership::OwnershipModule;
