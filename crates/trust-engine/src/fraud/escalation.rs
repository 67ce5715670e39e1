//! Pure escalation decision from the cumulative flag count.
//!
//! Separated from the recorder so the policy is testable without a store.
//! The critical penalty and the suspension transition fire exactly once
//! per crossing: the already-suspended guard keeps later flags from
//! re-applying them, and a moderation reinstate re-arms the path.

use serde::{Deserialize, Serialize};

use crate::config::TrustPolicyConfig;

/// What to apply for one recorded flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    /// Applied on every flag.
    pub immediate_delta: i32,
    /// Applied only on the critical crossing.
    pub critical_delta: Option<i32>,
    /// Transition the account to suspended.
    pub suspend: bool,
    /// The count just reached the warning threshold.
    pub warning: bool,
}

/// Decide consequences for a post-increment flag count.
#[must_use]
pub fn escalate(
    fraud_flags: u64,
    already_suspended: bool,
    config: &TrustPolicyConfig,
) -> Escalation {
    let critical = fraud_flags >= config.flags_critical && !already_suspended;
    Escalation {
        immediate_delta: config.spam_activity_delta,
        critical_delta: critical.then_some(config.fraud_confirmed_delta),
        suspend: critical,
        warning: fraud_flags == config.flags_warning,
    }
}
