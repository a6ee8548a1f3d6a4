use crate::prelude::*;
use ferry_core::Fault;
use serde_json::json;

#[test]
fn record_is_released_after_all_listeners_ran() {
    let (scope, native) = binary_scope();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("a", &log))
        .unwrap();
    scope
        .on("session:started", recording_listener("b", &log))
        .unwrap();

    let record = native.deliver_record("mesh_subscribe_session_started", json!({"x": 1}));

    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(native.dropped(), vec![record]);
    assert_eq!(native.live_records(), 0);
}

// No consumer is not an excuse to leak: an emptied listener sequence still
// releases every delivered record.
#[test]
fn record_is_released_with_zero_listeners() {
    let (scope, native) = binary_scope();
    let listener = scope.on("session:started", noop()).unwrap();
    scope.off("session:started", &listener).unwrap();

    let record = native.deliver_record("mesh_subscribe_session_started", json!({}));

    assert_eq!(native.dropped(), vec![record]);
    assert_eq!(native.live_records(), 0);
}

#[test]
fn every_delivery_releases_its_own_record() {
    let (scope, native) = binary_scope();
    scope.on("session:started", noop()).unwrap();

    for n in 0..5 {
        native.deliver_record("mesh_subscribe_session_started", json!({ "n": n }));
    }

    assert_eq!(native.dropped().len(), 5);
    assert_eq!(native.live_records(), 0);
}

#[tokio::test]
async fn malformed_text_payload_escalates_a_decode_fault() {
    let (scope, native) = text_scope();
    let mut faults = scope.fault_handler();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("l", &log))
        .unwrap();

    native.deliver_text("mesh_subscribe_session_started_json", "{not json");

    assert!(log.lock().unwrap().is_empty());
    let fault = faults.try_recv().unwrap();
    assert!(matches!(fault, Fault::Decode { event, .. } if event == "session:started"));
}

#[tokio::test]
async fn listener_fault_is_contained_and_escalated() {
    let (scope, native) = binary_scope();
    let mut faults = scope.fault_handler();
    let log = shared_log();
    scope
        .on(
            "session:started",
            std::sync::Arc::new(|_: &ferry_core::Payload| Err("listener exploded".into())),
        )
        .unwrap();
    scope
        .on("session:started", recording_listener("after", &log))
        .unwrap();

    let record = native.deliver_record("mesh_subscribe_session_started", json!({}));

    // The sibling ran, the record was still released, and the fault surfaced.
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(native.dropped(), vec![record]);
    let fault = faults.try_recv().unwrap();
    assert!(matches!(fault, Fault::Listener { index: 0, .. }));
}

#[test]
fn text_dispatch_decodes_before_invoking() {
    let (scope, native) = text_scope();
    let log = shared_log();
    scope
        .on("session:started", recording_listener("l", &log))
        .unwrap();

    native.deliver_text(
        "mesh_subscribe_session_started_json",
        r#"{"site":"kitchen","count":2}"#,
    );

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, vec![("l", json!({"site": "kitchen", "count": 2}))]);
}
