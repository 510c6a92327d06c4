//! Tier precedence over the built-in pattern lists.

use mirage_policy::{Decision, Payload, PolicyEngine, Tier};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_documented_precedence_cases() {
    let engine = PolicyEngine::default();

    // Essential and telemetry both match: essential wins.
    assert_eq!(
        engine.classify("http://localhost:8080/analytics/collect", &Payload::Empty),
        Decision::Allow
    );

    // Identity keyword on an unclassified destination.
    assert_eq!(
        engine.classify(
            "https://unlisted.example.net/upload",
            &Payload::from(r#"{"machineId":"abc"}"#)
        ),
        Decision::ReplaceIdentity
    );

    // Telemetry host with an arbitrary payload.
    assert_eq!(
        engine.classify(
            "https://api.segment.io/v1/batch",
            &Payload::from(json!({"batch": [1, 2, 3]}))
        ),
        Decision::Intercept
    );
}

#[test]
fn test_loopback_v6_is_essential() {
    let engine = PolicyEngine::default();
    let result = engine.explain("http://[::1]:9000/telemetry", &Payload::Empty);
    assert_eq!(result.tier, Tier::Essential);
}

proptest! {
    #[test]
    fn essential_destinations_always_allowed(path in "[a-z/]{0,20}", body in ".{0,40}") {
        let engine = PolicyEngine::default();
        let destination = format!("http://localhost/{}", path);
        prop_assert_eq!(
            engine.classify(&destination, &Payload::Text(body)),
            Decision::Allow
        );
    }

    #[test]
    fn identity_endpoints_never_intercepted(body in ".{0,40}") {
        let engine = PolicyEngine::default();
        let decision = engine.classify("https://telemetry.example.com/api/auth", &Payload::Text(body));
        prop_assert_eq!(decision, Decision::ReplaceIdentity);
    }
}
