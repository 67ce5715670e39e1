//! Bounded authenticity-score ledger.
//!
//! Exclusively owns score mutations: clamps into `[SCORE_MIN, SCORE_MAX]`,
//! recomputes the trust tier, counts penalties, and persists all three as
//! one store update. Adjustments are a best-effort side channel of some
//! primary request — a missing user is a no-op, never an error.
//!
//! Log codes:
//! - `TRUST-LEDGER-001`: score adjusted

use std::sync::Arc;

use tracing::info;

use crate::storage::{StoreError, UserId, UserStore};

use super::TrustTier;

pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

pub const LEDGER_SCORE_ADJUSTED: &str = "TRUST-LEDGER-001";

/// Applies score deltas against the user store.
#[derive(Clone)]
pub struct ScoreLedger {
    users: Arc<dyn UserStore>,
}

impl ScoreLedger {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Apply `delta` to the user's authenticity score.
    ///
    /// Out-of-range results clamp, never error. A negative delta increments
    /// the penalty counter by exactly one regardless of magnitude. Missing
    /// users no-op; store failures propagate.
    pub fn adjust(&self, user: &UserId, delta: i32, reason: &str) -> Result<(), StoreError> {
        let Some(record) = self.users.get(user)? else {
            return Ok(());
        };

        let old_score = record.authenticity_score;
        let new_score = old_score.saturating_add(delta).clamp(SCORE_MIN, SCORE_MAX);
        let tier = TrustTier::for_score(new_score);
        let negative_flags = if delta < 0 {
            record.negative_flags.saturating_add(1)
        } else {
            record.negative_flags
        };

        match self
            .users
            .update_reputation(user, new_score, tier, negative_flags)
        {
            // User deleted between read and write: still a no-op.
            Err(StoreError::UserNotFound(_)) => return Ok(()),
            other => other?,
        }

        info!(
            code = LEDGER_SCORE_ADJUSTED,
            user = %user,
            delta,
            old_score,
            new_score,
            tier = %tier,
            reason,
            "authenticity score adjusted"
        );
        Ok(())
    }
}
