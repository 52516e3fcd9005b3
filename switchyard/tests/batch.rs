mod common;

use common::Fixture;
use switchyard::{
    Calldata, ErrorKind, MAX_CALL_DEPTH, Module, OperationCode, ProxyError, calls, codec,
    selectors,
    testing::{CounterModule, RevertModule},
};

/// `request` wrapped in `levels` nested batches.
fn nested(request: Calldata, levels: usize) -> Calldata {
    (0..levels).fold(request, |inner, _| calls::batch_invoke(&[inner]).unwrap())
}

#[tokio::test]
async fn results_come_back_in_request_order() {
    let (mut fx, _) = Fixture::with_counter().await;
    let outputs = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                CounterModule::increment_by(10).unwrap(),
                Calldata::bare(CounterModule::COUNT),
                calls::current_principal(),
            ],
            0,
        )
        .await
        .unwrap();

    assert_eq!(outputs.len(), 4);
    assert_eq!(codec::decode::<u64>(&outputs[0]).unwrap(), 1);
    assert_eq!(codec::decode::<u64>(&outputs[1]).unwrap(), 11);
    assert_eq!(codec::decode::<u64>(&outputs[2]).unwrap(), 11);
    assert_eq!(
        codec::decode::<switchyard::Address>(&outputs[3]).unwrap(),
        fx.owner
    );
    assert_eq!(fx.counter(), 11);
}

#[tokio::test]
async fn one_failure_aborts_the_whole_batch() {
    let (mut fx, _) = Fixture::with_counter().await;
    fx.deploy_and_add(RevertModule).await;
    let events = fx.event_count();

    let err = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                Calldata::bare(RevertModule::FAIL),
                CounterModule::increment_by(5).unwrap(),
            ],
            0,
        )
        .await
        .unwrap_err();

    assert_eq!(err, ProxyError::revert(RevertModule::REASON));
    assert_eq!(err.to_string(), RevertModule::REASON);
    assert_eq!(fx.counter(), 0);
    assert_eq!(fx.event_count(), events);
}

#[tokio::test]
async fn reasonless_failure_is_forwarded() {
    let (mut fx, _) = Fixture::with_counter().await;
    fx.deploy_and_add(RevertModule).await;

    let err = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                Calldata::bare(RevertModule::FAIL_SILENTLY),
            ],
            0,
        )
        .await
        .unwrap_err();
    assert_eq!(err, ProxyError::RevertWithoutReason);
    assert_eq!(err.to_string(), "failed delegatecall");
}

#[tokio::test]
async fn unknown_operation_aborts() {
    let (mut fx, _) = Fixture::with_counter().await;
    let unknown = OperationCode::from_bytes([0xde, 0xad, 0xbe, 0xef]);
    let err = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[Calldata::bare(CounterModule::INCREMENT), Calldata::bare(unknown)],
            0,
        )
        .await
        .unwrap_err();
    assert_eq!(err, ProxyError::FunctionDoesNotExist(unknown));
    assert_eq!(fx.counter(), 0);
}

#[tokio::test]
async fn value_reaches_every_sub_request() {
    let (mut fx, _) = Fixture::with_counter().await;
    fx.proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                Calldata::bare(CounterModule::INCREMENT),
            ],
            9,
        )
        .await
        .unwrap();
    assert_eq!(fx.counter(), 2);
    assert_eq!(fx.proxy.state().balance, 9);
}

#[tokio::test]
async fn non_payable_sub_request_rejects_value() {
    let (mut fx, _) = Fixture::with_counter().await;
    let err = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                Calldata::bare(CounterModule::RESET),
            ],
            1,
        )
        .await
        .unwrap_err();
    assert_eq!(err, ProxyError::NonPayable(CounterModule::RESET));
    assert_eq!(fx.counter(), 0);
    assert_eq!(fx.proxy.state().balance, 0);

    // Without value the same batch goes through.
    fx.proxy
        .batch_invoke(
            fx.user,
            &[
                Calldata::bare(CounterModule::INCREMENT),
                Calldata::bare(CounterModule::RESET),
            ],
            0,
        )
        .await
        .unwrap();
    assert_eq!(fx.counter(), 0);
}

#[tokio::test]
async fn batches_nest() {
    let (mut fx, _) = Fixture::with_counter().await;
    let inner = calls::batch_invoke(&[
        Calldata::bare(CounterModule::INCREMENT),
        Calldata::bare(CounterModule::INCREMENT),
    ])
    .unwrap();

    let outputs = fx
        .proxy
        .batch_invoke(fx.user, &[inner, Calldata::bare(CounterModule::COUNT)], 0)
        .await
        .unwrap();
    let nested: Vec<switchyard::Bytes> = codec::decode(&outputs[0]).unwrap();
    assert_eq!(nested.len(), 2);
    assert_eq!(codec::decode::<u64>(&outputs[1]).unwrap(), 2);
}

#[tokio::test]
async fn batch_is_built_in_and_immutable() {
    let fx = Fixture::standard().await;
    let address = fx.proxy.module_of(selectors::BATCH_INVOKE).await.unwrap();
    assert_eq!(address, fx.proxy.address());
    assert!(fx.proxy.state().registry.is_immutable(selectors::BATCH_INVOKE));
    assert_eq!(
        fx.host
            .code_at(address)
            .map(|code| code.interface_dyn().selectors()),
        Some(vec![selectors::BATCH_INVOKE])
    );
    assert!(CounterModule.interface().function(selectors::BATCH_INVOKE).is_none());
}

#[tokio::test]
async fn malformed_batch_payload_is_a_decode_error() {
    let mut fx = Fixture::standard().await;
    let err = fx
        .proxy
        .call(
            fx.user,
            Calldata::new(selectors::BATCH_INVOKE, switchyard::Bytes::from_static(&[0xff])),
            0,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Decode(_)));
}

#[tokio::test]
async fn nesting_below_the_depth_limit_runs() {
    let (mut fx, _) = Fixture::with_counter().await;
    // One invocation per batch level plus the innermost request.
    let request = nested(Calldata::bare(CounterModule::INCREMENT), MAX_CALL_DEPTH - 1);
    fx.proxy.call(fx.user, request, 0).await.unwrap();
    assert_eq!(fx.counter(), 1);
}

#[tokio::test]
async fn nesting_past_the_depth_limit_is_rejected() {
    let (mut fx, _) = Fixture::with_counter().await;
    let events = fx.event_count();

    let deep = nested(Calldata::bare(CounterModule::INCREMENT), MAX_CALL_DEPTH);
    let err = fx
        .proxy
        .batch_invoke(
            fx.user,
            &[Calldata::bare(CounterModule::INCREMENT), deep],
            0,
        )
        .await
        .unwrap_err();

    assert_eq!(err, ProxyError::CallDepthExceeded { limit: MAX_CALL_DEPTH });
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fx.counter(), 0);
    assert_eq!(fx.event_count(), events);
    fx.proxy.state().registry.verify().unwrap();
}

#[tokio::test]
async fn far_too_deep_nesting_fails_cleanly() {
    let (mut fx, _) = Fixture::with_counter().await;
    let request = nested(calls::current_principal(), 2_000);
    assert_eq!(
        fx.proxy.call(fx.user, request, 0).await,
        Err(ProxyError::CallDepthExceeded { limit: MAX_CALL_DEPTH })
    );
}
