//! Per-request classification.
//!
//! Tiers are evaluated in order and the first match wins:
//!
//! 1. essential destination → [`Decision::Allow`]
//! 2. identity-verification destination → [`Decision::ReplaceIdentity`]
//! 3. payload mentions an identity keyword → [`Decision::ReplaceIdentity`]
//! 4. telemetry destination → [`Decision::Intercept`]
//! 5. anything else → [`Decision::Allow`]
//!
//! Destination patterns are plain substrings of the destination. Keywords
//! are matched case-insensitively against the textual view of the payload.

use crate::request::{destination_host, Payload};
use mirage_core::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// What happens to one outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    ReplaceIdentity,
    Intercept,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::ReplaceIdentity => "REPLACE_IDENTITY",
            Decision::Intercept => "INTERCEPT",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Essential,
    IdentityEndpoint,
    PersonalInfo,
    Telemetry,
    Default,
}

/// Decision plus the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub decision: Decision,
    pub tier: Tier,
}

/// Ordered classifier built from configurable pattern lists.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    essential: Vec<String>,
    identity: Vec<String>,
    telemetry: Vec<String>,
    /// Stored lowercased.
    keywords: Vec<String>,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}

impl PolicyEngine {
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            essential: non_empty(&config.essential_patterns),
            identity: non_empty(&config.identity_patterns),
            telemetry: non_empty(&config.telemetry_patterns),
            keywords: non_empty(&config.identity_keywords)
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, destination: &str, payload: &Payload) -> Decision {
        self.explain(destination, payload).decision
    }

    /// Classify and report the deciding tier.
    pub fn explain(&self, destination: &str, payload: &Payload) -> Classification {
        let (decision, tier) = if matches_any(destination, &self.essential) {
            (Decision::Allow, Tier::Essential)
        } else if matches_any(destination, &self.identity) {
            (Decision::ReplaceIdentity, Tier::IdentityEndpoint)
        } else if self.contains_personal_info(payload) {
            (Decision::ReplaceIdentity, Tier::PersonalInfo)
        } else if matches_any(destination, &self.telemetry) {
            (Decision::Intercept, Tier::Telemetry)
        } else {
            (Decision::Allow, Tier::Default)
        };

        debug!(
            host = %destination_host(destination),
            decision = %decision,
            tier = ?tier,
            "Request classified"
        );

        Classification { decision, tier }
    }

    pub fn is_essential(&self, destination: &str) -> bool {
        matches_any(destination, &self.essential)
    }

    pub fn is_identity_endpoint(&self, destination: &str) -> bool {
        matches_any(destination, &self.identity)
    }

    pub fn is_telemetry(&self, destination: &str) -> bool {
        matches_any(destination, &self.telemetry)
    }

    pub fn contains_personal_info(&self, payload: &Payload) -> bool {
        match payload.as_text() {
            Some(text) => {
                let text = text.to_lowercase();
                self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
            }
            None => false,
        }
    }
}

fn non_empty(patterns: &[String]) -> Vec<String> {
    patterns.iter().filter(|p| !p.is_empty()).cloned().collect()
}

fn matches_any(destination: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| destination.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> PolicyEngine {
        PolicyEngine::default()
    }

    #[test]
    fn test_essential_beats_telemetry() {
        let decision = engine().classify("http://localhost:3000/telemetry", &Payload::Empty);
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_essential_beats_personal_info() {
        let payload = Payload::from(json!({"machineId": "abc"}));
        let result = engine().explain("https://example.com/api/chat", &payload);
        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.tier, Tier::Essential);
    }

    #[test]
    fn test_identity_endpoint_replaces() {
        let result = engine().explain("https://example.com/api/auth/token", &Payload::Empty);
        assert_eq!(result.decision, Decision::ReplaceIdentity);
        assert_eq!(result.tier, Tier::IdentityEndpoint);
    }

    #[test]
    fn test_personal_info_on_unclassified_destination() {
        let payload = Payload::from(r#"{"machineId":"abc"}"#);
        let result = engine().explain("https://unclassified.example.org/v1", &payload);
        assert_eq!(result.decision, Decision::ReplaceIdentity);
        assert_eq!(result.tier, Tier::PersonalInfo);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let payload = Payload::from("HOSTNAME=box");
        assert!(engine().contains_personal_info(&payload));
    }

    #[test]
    fn test_personal_info_beats_telemetry() {
        let payload = Payload::from(json!({"deviceId": "x"}));
        let decision = engine().classify("https://api.segment.io/v1/batch", &payload);
        assert_eq!(decision, Decision::ReplaceIdentity);
    }

    #[test]
    fn test_telemetry_intercepted() {
        let payload = Payload::from(json!({"event": "opened"}));
        assert_eq!(
            engine().classify("https://api.segment.io/v1/batch", &payload),
            Decision::Intercept
        );
        assert_eq!(
            engine().classify("https://api.mixpanel.com/track", &Payload::Empty),
            Decision::Intercept
        );
    }

    #[test]
    fn test_default_allows() {
        let decision = engine().classify("https://crates.io/api/v1/crates", &Payload::from("{}"));
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_custom_lists() {
        let config = PolicyConfig {
            essential_patterns: vec![],
            identity_patterns: vec![],
            telemetry_patterns: vec!["tracker.example".to_string()],
            identity_keywords: vec!["serialNumber".to_string()],
            identity_headers: vec![],
        };
        let engine = PolicyEngine::from_config(&config);
        assert_eq!(
            engine.classify("http://localhost/tracker.example", &Payload::Empty),
            Decision::Intercept
        );
        assert_eq!(
            engine.classify("https://x.org", &Payload::from("serialnumber: 1")),
            Decision::ReplaceIdentity
        );
        assert_eq!(
            engine.classify("https://x.org", &Payload::from(r#"{"machineId":1}"#)),
            Decision::Allow
        );
    }

    #[test]
    fn test_empty_patterns_ignored() {
        let config = PolicyConfig {
            telemetry_patterns: vec![String::new()],
            ..PolicyConfig::default()
        };
        let engine = PolicyEngine::from_config(&config);
        assert_eq!(engine.classify("https://x.org", &Payload::Empty), Decision::Allow);
    }

    #[test]
    fn test_decision_serializes_upper() {
        assert_eq!(
            serde_json::to_string(&Decision::ReplaceIdentity).unwrap(),
            "\"REPLACE_IDENTITY\""
        );
        assert_eq!(Decision::Intercept.to_string(), "INTERCEPT");
    }
}
