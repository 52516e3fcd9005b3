//! Read views over the registry and the capability flags.

use crate::{calls::ModuleListing, selectors};
use switchyard_core::{
    Address, Bytes, CallContext, Calldata, CapabilityId, Function, FunctionFlags, Interface,
    Module, OperationCode, ProxyError, codec,
};

/// Pure reads. Module order follows registry history and carries no meaning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionModule;

impl Module for IntrospectionModule {
    fn interface(&self) -> Interface {
        use selectors::signatures as sig;
        Interface::new([
            Function::new(sig::MODULES, selectors::MODULES, FunctionFlags::VIEW),
            Function::new(sig::OPERATIONS_OF, selectors::OPERATIONS_OF, FunctionFlags::VIEW),
            Function::new(sig::LIST_MODULES, selectors::LIST_MODULES, FunctionFlags::VIEW),
            Function::new(sig::MODULE_OF, selectors::MODULE_OF, FunctionFlags::VIEW),
            Function::new(
                sig::SUPPORTS_CAPABILITY,
                selectors::SUPPORTS_CAPABILITY,
                FunctionFlags::VIEW,
            ),
        ])
    }

    async fn invoke(&self, ctx: &mut CallContext<'_>, input: Calldata) -> Result<Bytes, ProxyError> {
        let registry = ctx.registry();
        match input.selector() {
            selectors::MODULES => {
                let listing: ModuleListing = registry
                    .modules()
                    .iter()
                    .map(|m| (*m, registry.operations_of(*m).to_vec()))
                    .collect();
                codec::encode(&listing)
            }
            selectors::OPERATIONS_OF => {
                let module: Address = input.decode()?;
                codec::encode(registry.operations_of(module))
            }
            selectors::LIST_MODULES => codec::encode(registry.modules()),
            selectors::MODULE_OF => {
                let op: OperationCode = input.decode()?;
                codec::encode(&registry.module_of(op))
            }
            selectors::SUPPORTS_CAPABILITY => {
                let id: CapabilityId = input.decode()?;
                codec::encode(&ctx.flags().supports(id))
            }
            other => Err(ProxyError::FunctionDoesNotExist(other)),
        }
    }
}
