//! Static catalog of detectable behavior patterns.
//!
//! The catalog is a fixed, small enumerated set, not user-authorable. It is
//! carried as injected configuration so tests can tighten or loosen limits
//! without touching probe logic.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::storage::Severity;

/// A rate rule: at most `limit - 1` occurrences inside the trailing window
/// before the next one trips the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRule {
    /// Occurrence count at which the probe fires.
    pub limit: u64,
    /// Sliding window size, in minutes.
    pub window_minutes: i64,
    /// Human-readable reason recorded on the fraud event.
    pub reason: String,
    pub severity: Severity,
}

impl CountRule {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }
}

/// A binary claim-validity rule: no count or window, triggered by external
/// judgment (moderation) rather than counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRule {
    pub reason: String,
    pub severity: Severity,
}

/// The full rule set evaluated by the behavior probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCatalog {
    pub rapid_ad_submissions: CountRule,
    pub message_spam: CountRule,
    /// Catalog-only: reaches the recorder through moderation, never a probe.
    pub fake_claims: ClaimRule,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            rapid_ad_submissions: CountRule {
                limit: 3,
                window_minutes: 10,
                reason: "Multiple ad submissions in short time".to_owned(),
                severity: Severity::Medium,
            },
            message_spam: CountRule {
                limit: 10,
                window_minutes: 5,
                reason: "Spam messaging detected".to_owned(),
                severity: Severity::Low,
            },
            fake_claims: ClaimRule {
                reason: "Unverified or misleading claims".to_owned(),
                severity: Severity::High,
            },
        }
    }
}
