use crate::prelude::*;
use ferry_core::{BridgeError, NativeCallRecord};
use serde_json::json;

#[test]
fn facade_is_resolved_exactly_once() {
    let (scope, native) = binary_scope();

    scope.on("session:started", noop()).unwrap();
    scope.on("session:ended", noop()).unwrap();
    scope.publish("heartbeat", None).unwrap();

    let resolutions: Vec<_> = native
        .calls()
        .into_iter()
        .filter(|call| matches!(call, NativeCallRecord::ResolveFacade { .. }))
        .collect();
    assert_eq!(
        resolutions,
        vec![NativeCallRecord::ResolveFacade {
            name: FACADE_NAME.to_string(),
            protocol: 17,
        }]
    );
}

#[test]
fn every_call_is_scoped_by_the_same_facade() {
    let (scope, native) = binary_scope();
    scope.publish("heartbeat", None).unwrap();
    scope.publish("heartbeat", None).unwrap();

    let facades: Vec<u64> = native
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            NativeCallRecord::Call { args, .. } => match args.first() {
                Some(ferry_core::NativeValue::Facade(raw)) => Some(*raw),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(facades.len(), 2);
    assert_eq!(facades[0], facades[1]);
}

#[test]
fn destroy_releases_trampolines_and_rejects_calls() {
    let (scope, _native) = binary_scope();
    let listener = scope.on("session:started", noop()).unwrap();
    assert_eq!(scope.registration_count(), 1);

    scope.destroy();

    assert_eq!(scope.registration_count(), 0);
    assert!(matches!(
        scope.on("session:started", noop()),
        Err(BridgeError::Destroyed)
    ));
    assert!(matches!(
        scope.off("session:started", &listener),
        Err(BridgeError::Destroyed)
    ));
    assert!(matches!(
        scope.publish("heartbeat", None),
        Err(BridgeError::Destroyed)
    ));
}

#[test]
fn delivery_after_destroy_is_dropped() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("l", &log))
        .unwrap();

    scope.destroy();
    native.deliver_record("mesh_subscribe_session_started", json!({}));

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn destroy_is_idempotent() {
    let (scope, _native) = binary_scope();
    scope.on("session:started", noop()).unwrap();

    scope.destroy();
    scope.destroy();

    assert_eq!(scope.registration_count(), 0);
}

// Trampoline delivery may arrive from a thread the foreign library controls;
// dispatch must still reach listeners registered from this one.
#[test]
fn delivery_from_a_foreign_thread_reaches_listeners() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("l", &log))
        .unwrap();

    let handle = std::thread::spawn(move || {
        native.deliver_record("mesh_subscribe_session_started", json!({"from": "elsewhere"}));
    });
    handle.join().unwrap();

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, vec![("l", json!({"from": "elsewhere"}))]);
}
