use crate::prelude::*;
use serde_json::json;

#[test]
fn once_runs_exactly_once_across_two_deliveries() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .once("session:started", recording_listener("once", &log))
        .unwrap();

    native.deliver_record("mesh_subscribe_session_started", json!({"n": 1}));
    native.deliver_record("mesh_subscribe_session_started", json!({"n": 2}));

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, vec![("once", json!({"n": 1}))]);
}

#[test]
fn once_removes_itself_before_invoking_the_listener() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .once("session:started", recording_listener("once", &log))
        .unwrap();

    native.deliver_record("mesh_subscribe_session_started", json!({}));

    // Gone from the sequence by the time the listener body observes it.
    assert_eq!(log.lock().unwrap().len(), 1);
    native.deliver_record("mesh_subscribe_session_started", json!({}));
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn cancel_before_fire_requires_the_wrapper_reference() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    let original = recording_listener("once", &log);
    let wrapper = scope
        .once("session:started", original.clone())
        .unwrap();

    // The original reference is not what is registered.
    assert!(!scope.off("session:started", &original).unwrap());
    // The wrapper is.
    assert!(scope.off("session:started", &wrapper).unwrap());

    native.deliver_record("mesh_subscribe_session_started", json!({}));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn once_and_on_coexist_for_the_same_event() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("durable", &log))
        .unwrap();
    scope
        .once("session:started", recording_listener("oneshot", &log))
        .unwrap();

    native.deliver_record("mesh_subscribe_session_started", json!({}));
    native.deliver_record("mesh_subscribe_session_started", json!({}));

    let tags: Vec<&str> = log.lock().unwrap().iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, vec!["durable", "oneshot", "durable"]);
}
