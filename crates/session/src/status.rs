//! Control-surface views.

use mirage_identity::FieldCounts;
use mirage_policy::InterceptionStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Running,
    Shutdown,
}

/// Identity summary safe to print: the machine id is truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub identity_id: String,
    pub hostname: String,
    pub username: String,
    pub hardware_template: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    pub identity_store: bool,
    /// The next three hold when the component is bound to the current profile.
    pub hardware_profile: bool,
    pub request_rewriter: bool,
    pub telemetry_surface: bool,
    /// Number of catalog templates; 1 when running on the fallback.
    pub catalog_templates: usize,
    /// Whether the last profile write reached disk.
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub version: String,
    pub status: SessionState,
    pub started_at: u64,
    pub uptime_ms: u64,
    pub profile: ProfileSummary,
    pub components: ComponentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub network: InterceptionStats,
    pub profile: FieldCounts,
}
