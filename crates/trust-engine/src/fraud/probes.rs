//! Behavior probes embedded in the platform's write paths.
//!
//! Each probe counts the caller's own prior writes of one kind inside the
//! rule's trailing window (inclusive lower bound `now - window`) and
//! invokes the recorder when the count reaches the rule's limit. Probes
//! are advisory: the primary write has already been committed by the time
//! a probe runs, and its outcome never depends on the probe's.
//!
//! Log codes:
//! - `TRUST-PROBE-001`: rate rule tripped

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::storage::{ActivityKind, ActivityStore, StoreError, UserId};

use super::recorder::{FlagRequest, FraudRecorder};
use super::rules::{CountRule, RuleCatalog};

pub const PROBE_RULE_TRIPPED: &str = "TRUST-PROBE-001";

/// Sliding-window rate checks over the activity store.
#[derive(Clone)]
pub struct BehaviorProbes {
    activity: Arc<dyn ActivityStore>,
    recorder: FraudRecorder,
    catalog: RuleCatalog,
}

impl BehaviorProbes {
    pub fn new(
        activity: Arc<dyn ActivityStore>,
        recorder: FraudRecorder,
        catalog: RuleCatalog,
    ) -> Self {
        Self {
            activity,
            recorder,
            catalog,
        }
    }

    /// Probe run after an ad submission. Returns whether the rule tripped.
    pub fn check_ad_submission(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.check_rate_rule(
            user,
            ActivityKind::AdSubmission,
            &self.catalog.rapid_ad_submissions,
            now,
        )
    }

    /// Probe run after a message send. Returns whether the rule tripped.
    pub fn check_message_send(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.check_rate_rule(user, ActivityKind::MessageSend, &self.catalog.message_spam, now)
    }

    fn check_rate_rule(
        &self,
        user: &UserId,
        kind: ActivityKind,
        rule: &CountRule,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let cutoff = now - rule.window();
        let count = self.activity.count_since(user, kind, cutoff)?;
        if count < rule.limit {
            return Ok(false);
        }

        info!(
            code = PROBE_RULE_TRIPPED,
            user = %user,
            kind = ?kind,
            count,
            limit = rule.limit,
            window_minutes = rule.window_minutes,
            "rate rule tripped"
        );
        self.recorder.flag_user(
            FlagRequest::system(user.clone(), rule.reason.clone()).with_severity(rule.severity),
            now,
        )?;
        Ok(true)
    }
}
