//! Outbound request policy for Mirage.
//!
//! Every outbound call is classified by the [`PolicyEngine`] into one of
//! three decisions and then handled by the [`RequestRewriter`]:
//!
//! - `ALLOW`: forwarded unmodified
//! - `REPLACE_IDENTITY`: real identity values swapped for profile values, then forwarded
//! - `INTERCEPT`: answered locally with a canned success response
//!
//! No failure in this crate stops a request. When a payload cannot be
//! rewritten it is forwarded as it came.

pub mod engine;
pub mod request;
pub mod rewriter;
pub mod stats;

pub use engine::{Classification, Decision, PolicyEngine, Tier};
pub use request::{
    destination_host, OutboundRequest, Payload, Response, Transport, TransportError,
};
pub use rewriter::{RequestRewriter, RewriteError, RewriteResult, Routed, Substitutions};
pub use stats::InterceptionStats;
