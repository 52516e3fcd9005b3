mod common;

use common::Fixture;
use switchyard::{CapabilityId, ErrorKind, ProxyError, ProxyEvent, capability};

const COUNTER: CapabilityId = capability!("increment()", "count()");

#[tokio::test]
async fn set_and_query() {
    let mut fx = Fixture::standard().await;
    let other = CapabilityId::from_bytes([0, 0, 0, 7]);

    let receipt = fx
        .proxy
        .set_capabilities(fx.owner, &[COUNTER, other], &[true, false])
        .await
        .unwrap();
    assert_eq!(
        receipt.events,
        vec![
            ProxyEvent::CapabilityUpdated {
                id: COUNTER,
                supported: true,
            },
            ProxyEvent::CapabilityUpdated {
                id: other,
                supported: false,
            },
        ]
    );
    assert!(fx.proxy.supports_capability(COUNTER).await.unwrap());
    assert!(!fx.proxy.supports_capability(other).await.unwrap());

    fx.proxy
        .set_capabilities(fx.owner, &[COUNTER], &[false])
        .await
        .unwrap();
    assert!(!fx.proxy.supports_capability(COUNTER).await.unwrap());
}

#[tokio::test]
async fn length_mismatch_is_rejected() {
    let mut fx = Fixture::standard().await;
    let events = fx.event_count();
    let err = fx
        .proxy
        .set_capabilities(fx.owner, &[COUNTER], &[true, true])
        .await
        .unwrap_err();
    assert_eq!(err, ProxyError::LengthMismatch { ids: 1, flags: 2 });
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fx.event_count(), events);
    assert!(!fx.proxy.supports_capability(COUNTER).await.unwrap());
}

#[tokio::test]
async fn invalid_id_is_never_supported() {
    let mut fx = Fixture::standard().await;
    fx.proxy
        .set_capabilities(fx.owner, &[CapabilityId::INVALID], &[true])
        .await
        .unwrap();
    assert!(
        !fx.proxy
            .supports_capability(CapabilityId::INVALID)
            .await
            .unwrap()
    );
}

#[test]
fn capability_macro_matches_runtime_xor() {
    use switchyard::OperationCode;
    let runtime = CapabilityId::of_operations([
        OperationCode::of("increment()").unwrap(),
        OperationCode::of("count()").unwrap(),
    ]);
    assert_eq!(COUNTER, runtime);
}
