//! Session context and control surface for Mirage.
//!
//! A [`Session`] is constructed once at startup and passed explicitly to
//! whatever hosts the interception points. It answers surface queries,
//! routes outbound requests and exposes `get_profile`, `get_status`,
//! `get_stats` and `reset_identity`.

pub mod error;
pub mod session;
pub mod status;

pub use error::{DispatchError, DispatchResult};
pub use session::Session;
pub use status::{ComponentStatus, ProfileSummary, SessionState, SessionStats, SessionStatus};
