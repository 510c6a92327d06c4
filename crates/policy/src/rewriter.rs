//! Request rewriter.
//!
//! Applies the policy decision to an outbound request. Allowed requests
//! pass through untouched, intercepted ones are answered locally, and
//! identity-bearing ones have every real identity value replaced with the
//! matching profile value before they are forwarded.
//!
//! Substitution is whole-token and case-sensitive. JSON payloads are walked
//! key by key and value by value; only text that does not parse as JSON gets
//! a raw text pass.

use crate::engine::{Decision, PolicyEngine};
use crate::request::{OutboundRequest, Payload, Response};
use crate::stats::InterceptionStats;
use mirage_core::PolicyConfig;
use mirage_identity::{IdentityProfile, RealIdentity};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

pub type RewriteResult<T> = Result<T, RewriteError>;

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Hand to the real transport.
    Forward {
        decision: Decision,
        request: OutboundRequest,
    },
    /// Answer locally; the transport never sees the request.
    ShortCircuit {
        decision: Decision,
        response: Response,
    },
}

impl Routed {
    pub fn decision(&self) -> Decision {
        match self {
            Routed::Forward { decision, .. } => *decision,
            Routed::ShortCircuit { decision, .. } => *decision,
        }
    }
}

/// Real-to-synthetic replacement table, longest needle first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new(real: &RealIdentity, profile: &IdentityProfile) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let hostname = &profile.system.hostname;
        let username = &profile.system.username;

        let candidates = std::iter::once((&real.hostname, hostname))
            .chain(std::iter::once((&real.username, username)))
            .chain(real.env_users.iter().map(|user| (user, username)));

        for (needle, replacement) in candidates {
            if needle.is_empty() || needle == replacement {
                continue;
            }
            if pairs.iter().any(|(existing, _)| existing == needle) {
                continue;
            }
            pairs.push((needle.clone(), replacement.clone()));
        }

        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Replace every whole-token occurrence in one pass, so replacement
    /// text is never matched again. Returns the new text and the count.
    pub fn apply(&self, text: &str) -> (String, usize) {
        if self.pairs.is_empty() {
            return (text.to_string(), 0);
        }

        let mut out = String::with_capacity(text.len());
        let mut count = 0;
        let mut pos = 0;
        let mut prev: Option<char> = None;

        while pos < text.len() {
            let rest = &text[pos..];
            let at_boundary = prev.map_or(true, |c| !is_token_char(c));
            let hit = if at_boundary {
                self.pairs.iter().find(|(needle, _)| {
                    rest.starts_with(needle.as_str())
                        && rest[needle.len()..]
                            .chars()
                            .next()
                            .map_or(true, |c| !is_token_char(c))
                })
            } else {
                None
            };

            match hit {
                Some((needle, replacement)) => {
                    out.push_str(replacement);
                    prev = needle.chars().next_back();
                    pos += needle.len();
                    count += 1;
                }
                None => {
                    let Some(c) = rest.chars().next() else { break };
                    out.push(c);
                    prev = Some(c);
                    pos += c.len_utf8();
                }
            }
        }

        (out, count)
    }

    /// Structured pass: rewrite object keys and string values in place,
    /// leaving numbers and shape alone.
    pub fn apply_value(&self, value: &mut Value) -> usize {
        match value {
            Value::String(text) => {
                let (replaced, count) = self.apply(text);
                if count > 0 {
                    *text = replaced;
                }
                count
            }
            Value::Array(items) => items.iter_mut().map(|v| self.apply_value(v)).sum(),
            Value::Object(map) => {
                let mut count = 0;
                for (key, mut item) in std::mem::take(map) {
                    let (key, key_hits) = self.apply(&key);
                    count += key_hits + self.apply_value(&mut item);
                    map.insert(key, item);
                }
                count
            }
            _ => 0,
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Routes requests for one identity profile.
#[derive(Debug, Clone)]
pub struct RequestRewriter {
    engine: PolicyEngine,
    profile: Arc<IdentityProfile>,
    substitutions: Substitutions,
    identity_headers: Vec<String>,
}

impl RequestRewriter {
    pub fn new(
        engine: PolicyEngine,
        profile: Arc<IdentityProfile>,
        real: &RealIdentity,
        identity_headers: Vec<String>,
    ) -> Self {
        let substitutions = Substitutions::new(real, &profile);
        Self {
            engine,
            profile,
            substitutions,
            identity_headers,
        }
    }

    pub fn from_config(
        config: &PolicyConfig,
        profile: Arc<IdentityProfile>,
        real: &RealIdentity,
    ) -> Self {
        Self::new(
            PolicyEngine::from_config(config),
            profile,
            real,
            config.identity_headers.clone(),
        )
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    pub fn profile(&self) -> &Arc<IdentityProfile> {
        &self.profile
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// Classify, apply the decision and record it.
    pub fn route(&self, request: OutboundRequest, stats: &mut InterceptionStats) -> Routed {
        let decision = self.engine.classify(&request.destination, &request.payload);
        stats.record(decision);

        match decision {
            Decision::Allow => Routed::Forward { decision, request },
            Decision::Intercept => {
                info!(host = %request.host(), "Telemetry request intercepted");
                Routed::ShortCircuit {
                    decision,
                    response: Response::canned_success(),
                }
            }
            Decision::ReplaceIdentity => {
                let request = self.replace_identity(request);
                Routed::Forward { decision, request }
            }
        }
    }

    /// Substitute identity values in headers and payload. A payload that
    /// cannot be rewritten is forwarded as it came.
    pub fn replace_identity(&self, mut request: OutboundRequest) -> OutboundRequest {
        let header_hits = self.rewrite_headers(&mut request.headers);

        let payload_hits = match self.rewrite_payload(&request.payload) {
            Ok((payload, hits)) => {
                request.payload = payload;
                hits
            }
            Err(e) => {
                warn!(host = %request.host(), error = %e, "Payload left unmodified");
                0
            }
        };

        info!(
            host = %request.host(),
            headers = header_hits,
            payload = payload_hits,
            "Identity values replaced"
        );
        request
    }

    pub fn rewrite_headers(&self, headers: &mut [(String, String)]) -> usize {
        let mut hits = 0;
        for (name, value) in headers.iter_mut() {
            let bearing = self
                .identity_headers
                .iter()
                .any(|h| h.eq_ignore_ascii_case(name));
            if !bearing {
                continue;
            }
            let (replaced, count) = self.substitutions.apply(value);
            if count > 0 {
                *value = replaced;
                hits += count;
            }
        }
        hits
    }

    /// Rewrite a payload, keeping its shape.
    pub fn rewrite_payload(&self, payload: &Payload) -> RewriteResult<(Payload, usize)> {
        match payload {
            Payload::Empty => Ok((Payload::Empty, 0)),
            Payload::Json(value) => {
                let mut value = value.clone();
                let hits = self.substitutions.apply_value(&mut value);
                Ok((Payload::Json(value), hits))
            }
            Payload::Text(text) => {
                let (text, hits) = self.rewrite_text(text)?;
                Ok((Payload::Text(text), hits))
            }
            Payload::Bytes(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    RewriteError::MalformedPayload(format!("body is not UTF-8: {}", e))
                })?;
                let (text, hits) = self.rewrite_text(text)?;
                Ok((Payload::Bytes(text.into_bytes()), hits))
            }
        }
    }

    fn rewrite_text(&self, text: &str) -> RewriteResult<(String, usize)> {
        match serde_json::from_str::<Value>(text) {
            Ok(mut value) if value.is_object() || value.is_array() => {
                let hits = self.substitutions.apply_value(&mut value);
                if hits == 0 {
                    return Ok((text.to_string(), 0));
                }
                let text = serde_json::to_string(&value)
                    .map_err(|e| RewriteError::MalformedPayload(e.to_string()))?;
                Ok((text, hits))
            }
            _ => Ok(self.substitutions.apply(text)),
        }
    }
}
