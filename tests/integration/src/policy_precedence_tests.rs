//! Tier precedence and statistics through the session.

use crate::test_utils::{RecordingTransport, TestEnv};
use mirage_policy::{Decision, OutboundRequest, Payload, Response};
use serde_json::json;

#[test]
fn test_essential_wins_over_telemetry() {
    let session = TestEnv::new().session();
    let decision = session.classify("http://localhost:4000/telemetry/flush", &Payload::Empty);
    assert_eq!(decision, Decision::Allow);
}

#[test]
fn test_keyword_on_unclassified_destination() {
    let session = TestEnv::new().session();
    let decision = session.classify(
        "https://storage.example.net/v2/put",
        &Payload::Text(r#"{"machineId":"abc"}"#.to_string()),
    );
    assert_eq!(decision, Decision::ReplaceIdentity);
}

#[test]
fn test_segment_batch_is_intercepted() {
    let session = TestEnv::new().session();
    for payload in [
        Payload::Empty,
        Payload::Text("x".to_string()),
        Payload::Json(json!({"events": []})),
        Payload::Bytes(vec![0, 1, 2]),
    ] {
        assert_eq!(
            session.classify("https://api.segment.io/v1/batch", &payload),
            Decision::Intercept
        );
    }
}

#[test]
fn test_dispatch_counts_every_decision() {
    let env = TestEnv::new();
    let mut session = env.session();
    let mut transport = RecordingTransport::default();

    let requests = vec![
        OutboundRequest::new("https://example.com/api/chat", "POST"),
        OutboundRequest::new("https://example.com/api/login", "POST").with_payload("user=jordan"),
        OutboundRequest::new("https://www.google-analytics.com/collect", "POST"),
        OutboundRequest::new("https://docs.rs/", "GET"),
    ];

    let mut responses = Vec::new();
    for request in requests {
        responses.push(session.dispatch(request, &mut transport).unwrap());
    }

    let stats = session.get_stats().network;
    assert_eq!(stats.allowed, 2);
    assert_eq!(stats.replaced, 1);
    assert_eq!(stats.intercepted, 1);
    assert_eq!(stats.total, 4);

    assert_eq!(transport.sent.len(), 3);
    assert_eq!(responses[2], Response::canned_success());
    assert!(transport
        .sent
        .iter()
        .all(|r| !r.destination.contains("google-analytics")));
}
