#![allow(dead_code)]

use std::sync::Arc;
use switchyard::{
    Address, Bytes, Module, ModuleCut, ModuleHost, OperationCode, Proxy, ProxyEvent,
    testing::CounterModule,
};

// ============================================================================
// Fixture
// ============================================================================

pub struct Fixture {
    pub host: Arc<ModuleHost>,
    pub proxy: Proxy,
    pub owner: Address,
    pub user: Address,
}

impl Fixture {
    /// A proxy with the standard modules cut in.
    pub async fn standard() -> Self {
        init_tracing();
        let host = Arc::new(ModuleHost::new());
        let owner = Address::derive("owner");
        let proxy = Proxy::builder(host.clone())
            .owner(owner)
            .standard()
            .build()
            .await
            .expect("standard proxy");
        Self {
            host,
            proxy,
            owner,
            user: Address::derive("user"),
        }
    }

    /// The standard proxy plus a [`CounterModule`]. Returns the counter's address.
    pub async fn with_counter() -> (Self, Address) {
        let mut fx = Self::standard().await;
        let counter = fx.deploy_and_add(CounterModule).await;
        (fx, counter)
    }

    /// Deploy `module` and cut in its whole interface.
    pub async fn deploy_and_add<M: Module>(&mut self, module: M) -> Address {
        let selectors = module.interface().selectors();
        let address = self.host.deploy(module);
        self.add(address, selectors).await;
        address
    }

    /// Cut in `selectors` for `module` as the owner.
    pub async fn add(&mut self, module: Address, selectors: Vec<OperationCode>) {
        self.proxy
            .cut(
                self.owner,
                &[ModuleCut::add(module, selectors)],
                Address::ZERO,
                Bytes::new(),
            )
            .await
            .expect("add cut");
    }

    /// Apply `cuts` as the owner with no init step.
    pub async fn cut(&mut self, cuts: &[ModuleCut]) -> Result<(), switchyard::ProxyError> {
        self.proxy
            .cut(self.owner, cuts, Address::ZERO, Bytes::new())
            .await
            .map(|_| ())
    }

    pub fn counter(&self) -> u64 {
        CounterModule::read(&self.proxy.state().storage).expect("counter decodes")
    }

    pub fn event_count(&self) -> usize {
        self.proxy.events().len()
    }

    pub fn last_event(&self) -> Option<&ProxyEvent> {
        self.proxy.events().last()
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

pub fn sorted(mut ops: Vec<OperationCode>) -> Vec<OperationCode> {
    ops.sort();
    ops
}

/// Every operation the introspection views report, in listing order.
pub async fn listed_operations(proxy: &Proxy) -> Vec<OperationCode> {
    let mut all = Vec::new();
    for module in proxy.list_modules().await.expect("listModules") {
        all.extend(proxy.operations_of(module).await.expect("operationsOf"));
    }
    all
}
