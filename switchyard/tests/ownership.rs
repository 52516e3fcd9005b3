mod common;

use common::Fixture;
use switchyard::{
    Address, CapabilityId, ErrorKind, ModuleCut, ProxyError, ProxyEvent, testing::CounterModule,
};

#[tokio::test]
async fn transfer_moves_governance() {
    let mut fx = Fixture::standard().await;
    let receipt = fx.proxy.transfer_principal(fx.owner, fx.user).await.unwrap();

    assert_eq!(
        receipt.events,
        vec![ProxyEvent::OwnershipTransferred {
            previous: fx.owner,
            new: fx.user,
        }]
    );
    assert_eq!(fx.proxy.current_principal().await.unwrap(), fx.user);

    let counter = fx.host.deploy(CounterModule);
    let cuts = [ModuleCut::add(counter, vec![CounterModule::COUNT])];
    assert_eq!(
        fx.cut(&cuts).await,
        Err(ProxyError::NotContractOwner { caller: fx.owner })
    );
    fx.proxy
        .cut(fx.user, &cuts, Address::ZERO, switchyard::Bytes::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn only_the_principal_may_transfer() {
    let mut fx = Fixture::standard().await;
    let err = fx
        .proxy
        .transfer_principal(fx.user, fx.user)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert_eq!(fx.proxy.current_principal().await.unwrap(), fx.owner);
}

#[tokio::test]
async fn only_the_principal_may_set_capabilities() {
    let mut fx = Fixture::standard().await;
    let id = CapabilityId::from_bytes([1, 1, 1, 1]);
    assert_eq!(
        fx.proxy.set_capabilities(fx.user, &[id], &[true]).await,
        Err(ProxyError::NotContractOwner { caller: fx.user })
    );
    assert!(!fx.proxy.supports_capability(id).await.unwrap());
}

#[tokio::test]
async fn transfer_to_zero_is_allowed_and_final() {
    let mut fx = Fixture::standard().await;
    fx.proxy
        .transfer_principal(fx.owner, Address::ZERO)
        .await
        .unwrap();
    assert_eq!(fx.proxy.current_principal().await.unwrap(), Address::ZERO);
    assert!(matches!(
        fx.proxy.transfer_principal(fx.owner, fx.owner).await,
        Err(ProxyError::NotContractOwner { .. })
    ));
    assert!(matches!(
        fx.proxy.transfer_principal(Address::ZERO, fx.owner).await,
        Err(ProxyError::NotContractOwner { .. })
    ));
}
