use crate::engine::Decision;
use serde::{Deserialize, Serialize};

/// Process-lifetime interception counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptionStats {
    pub allowed: u64,
    pub replaced: u64,
    pub intercepted: u64,
    pub total: u64,
}

impl InterceptionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Allow => self.allowed += 1,
            Decision::ReplaceIdentity => self.replaced += 1,
            Decision::Intercept => self.intercepted += 1,
        }
        self.total += 1;
    }
}
