//! Escalation thresholds and score deltas as injected configuration.
//!
//! Every constant that drives a policy decision lives here so that callers
//! (and tests) can override thresholds without touching the decision logic.

use serde::{Deserialize, Serialize};

/// Thresholds and deltas for the fraud escalation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustPolicyConfig {
    /// Authenticity score assigned to a freshly created user record.
    pub default_score: i32,

    /// Cumulative fraud-flag count at which a warning is logged.
    pub flags_warning: u64,

    /// Cumulative fraud-flag count at which the critical penalty and
    /// suspension are triggered.
    pub flags_critical: u64,

    /// Score delta applied on every recorded flag.
    pub spam_activity_delta: i32,

    /// Score delta applied once when the critical threshold is crossed.
    pub fraud_confirmed_delta: i32,
}

impl Default for TrustPolicyConfig {
    fn default() -> Self {
        Self {
            default_score: 50,
            flags_warning: 2,
            flags_critical: 4,
            spam_activity_delta: -5,
            fraud_confirmed_delta: -30,
        }
    }
}
