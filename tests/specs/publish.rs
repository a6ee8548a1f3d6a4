use crate::prelude::*;
use ferry_core::{BuildOptions, EventDescriptor, EventRegistry, NativeCallRecord, NativeValue};
use serde_json::json;

#[test]
fn bare_publish_carries_only_the_facade() {
    let (scope, native) = binary_scope();
    native.clear_calls();

    scope.publish("heartbeat", None).unwrap();

    let calls = native.calls();
    assert_eq!(calls.len(), 1);
    let NativeCallRecord::Call { name, args } = &calls[0] else {
        panic!("expected a plain call");
    };
    assert_eq!(name, "mesh_publish_heartbeat");
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0], NativeValue::Facade(_)));
}

#[test]
fn bare_publish_skips_the_text_suffix_even_in_text_mode() {
    let (scope, native) = text_scope();
    native.clear_calls();

    scope.publish("heartbeat", None).unwrap();

    assert_eq!(native.calls_named("mesh_publish_heartbeat").len(), 1);
    assert!(native.calls_named("mesh_publish_heartbeat_json").is_empty());
}

#[test]
fn text_publish_round_trips_the_payload() {
    let (scope, native) = text_scope();
    native.clear_calls();

    let payload = json!({"session": "s-3", "site": "kitchen"});
    scope.publish("session:start", Some(&payload)).unwrap();

    let calls = native.calls_named("mesh_publish_session_start_json");
    assert_eq!(calls.len(), 1);
    let NativeCallRecord::Call { args, .. } = &calls[0] else {
        panic!("expected a plain call");
    };
    let NativeValue::Text(text) = &args[1] else {
        panic!("expected a text payload argument");
    };
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(text).unwrap(),
        payload
    );
}

#[test]
fn binary_publish_builds_once_with_the_configured_options() {
    let native = ferry_core::FakeNative::new();
    let options = BuildOptions {
        keep_nulls: true,
        byte_fields: vec!["waveform".to_string()],
    };
    let scope = ferry_core::Scope::new(
        std::sync::Arc::new(native.clone()),
        &ferry_core::ProtocolHandle(17),
        FACADE_NAME,
        ferry_core::ScopeOptions::default(),
    )
    .unwrap()
    .with_publish_events(
        EventRegistry::new().event(
            EventDescriptor::new("session:start", "mesh_publish_session_start")
                .with_codec(native.codec())
                .with_build_options(options.clone()),
        ),
    );
    native.clear_calls();

    let payload = json!({"session": "s-3"});
    scope.publish("session:start", Some(&payload)).unwrap();

    assert_eq!(native.builder_calls(), vec![(payload, options)]);
    let calls = native.calls_named("mesh_publish_session_start");
    assert_eq!(calls.len(), 1);
    let NativeCallRecord::Call { args, .. } = &calls[0] else {
        panic!("expected a plain call");
    };
    assert!(matches!(args[1], NativeValue::Record(_)));
}

#[test]
fn unknown_publish_identifier_is_rejected_before_any_call() {
    let (scope, native) = binary_scope();
    native.clear_calls();

    let err = scope.publish("zzz", None).unwrap_err();
    assert!(matches!(err, ferry_core::BridgeError::UnknownEvent(_)));
    assert!(native.calls().is_empty());
}

#[test]
fn failed_native_call_propagates_to_the_publisher() {
    let (scope, native) = text_scope();
    native.fail_calls(true);

    let err = scope.publish("heartbeat", None).unwrap_err();
    assert!(matches!(err, ferry_core::BridgeError::Native(_)));
}
