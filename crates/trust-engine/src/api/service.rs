//! Service facade wiring the stores, policy, probes, and moderation queue.
//!
//! This is what the (external) controller layer holds. The write-path
//! integration points commit the primary write first and run the probe
//! second; probe failures are logged and absorbed, so the caller's request
//! never fails because of fraud detection.
//!
//! Log codes:
//! - `TRUST-PROBE-002`: probe failed after a committed write (absorbed)

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TrustPolicyConfig;
use crate::fraud::{BehaviorProbes, FlagRequest, FraudRecorder, RuleCatalog};
use crate::moderation::ModerationQueue;
use crate::reputation::{ScoreLedger, TrustTier};
use crate::storage::{
    AccountStatus, ActivityKind, ActivityStore, FraudEvent, FraudEventStore, MemoryStore,
    ReportStore, StoreError, UserId, UserRecord, UserStore,
};

pub const PROBE_CHECK_FAILED: &str = "TRUST-PROBE-002";

/// Reputation subset served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationView {
    pub user_id: UserId,
    pub authenticity_score: i32,
    pub trust_tier: TrustTier,
    pub negative_flags: u64,
    pub fraud_flags: u64,
    pub last_fraud_at: Option<DateTime<Utc>>,
    pub status: AccountStatus,
}

impl From<UserRecord> for ReputationView {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            authenticity_score: record.authenticity_score,
            trust_tier: record.trust_tier,
            negative_flags: record.negative_flags,
            fraud_flags: record.fraud_flags,
            last_fraud_at: record.last_fraud_at,
            status: record.status,
        }
    }
}

/// The trust engine's public surface.
#[derive(Clone)]
pub struct TrustService {
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
    events: Arc<dyn FraudEventStore>,
    ledger: ScoreLedger,
    recorder: FraudRecorder,
    probes: BehaviorProbes,
    moderation: ModerationQueue,
    config: TrustPolicyConfig,
}

impl TrustService {
    /// Wire the service over one shared reference store.
    pub fn new(store: Arc<MemoryStore>, config: TrustPolicyConfig, catalog: RuleCatalog) -> Self {
        Self::with_stores(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config,
            catalog,
        )
    }

    /// Wire the service over arbitrary store implementations.
    pub fn with_stores(
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityStore>,
        events: Arc<dyn FraudEventStore>,
        reports: Arc<dyn ReportStore>,
        config: TrustPolicyConfig,
        catalog: RuleCatalog,
    ) -> Self {
        let ledger = ScoreLedger::new(users.clone());
        let recorder = FraudRecorder::new(
            users.clone(),
            events.clone(),
            ledger.clone(),
            config.clone(),
        );
        let probes = BehaviorProbes::new(activity.clone(), recorder.clone(), catalog);
        let moderation =
            ModerationQueue::new(users.clone(), events.clone(), reports, recorder.clone());
        Self {
            users,
            activity,
            events,
            ledger,
            recorder,
            probes,
            moderation,
            config,
        }
    }

    /// Seed a user record with the configured default score.
    pub fn register_user(&self, user: UserId, now: DateTime<Utc>) -> Result<UserRecord, StoreError> {
        let record = UserRecord::new(user, self.config.default_score, now);
        self.users.insert(record.clone())?;
        Ok(record)
    }

    /// Fire-and-forget score adjustment entry point.
    pub fn adjust_score(&self, user: &UserId, delta: i32, reason: &str) -> Result<(), StoreError> {
        self.ledger.adjust(user, delta, reason)
    }

    /// Fire-and-forget flag entry point.
    pub fn flag_user(&self, request: FlagRequest, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.recorder.flag_user(request, now)
    }

    /// Write-path integration: persist an ad submission, then probe.
    pub fn record_ad(&self, user: &UserId, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.activity
            .record_activity(user, ActivityKind::AdSubmission, now)?;
        if let Err(err) = self.probes.check_ad_submission(user, now) {
            warn!(
                code = PROBE_CHECK_FAILED,
                user = %user,
                error = %err,
                "ad submission probe failed; primary write unaffected"
            );
        }
        Ok(())
    }

    /// Write-path integration: persist a message send, then probe.
    pub fn record_message(&self, user: &UserId, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.activity
            .record_activity(user, ActivityKind::MessageSend, now)?;
        if let Err(err) = self.probes.check_message_send(user, now) {
            warn!(
                code = PROBE_CHECK_FAILED,
                user = %user,
                error = %err,
                "message probe failed; primary write unaffected"
            );
        }
        Ok(())
    }

    /// Score/tier/flags view, `None` for unknown users.
    pub fn reputation_of(&self, user: &UserId) -> Result<Option<ReputationView>, StoreError> {
        Ok(self.users.get(user)?.map(ReputationView::from))
    }

    /// A user's fraud events, newest first.
    pub fn events_for(&self, user: &UserId) -> Result<Vec<FraudEvent>, StoreError> {
        self.events.events_for(user)
    }

    /// The moderation surface (reports, admin actions, reinstatement).
    pub fn moderation(&self) -> &ModerationQueue {
        &self.moderation
    }

    pub fn config(&self) -> &TrustPolicyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn service() -> (TrustService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = TrustService::new(
            store.clone(),
            TrustPolicyConfig::default(),
            RuleCatalog::default(),
        );
        (service, store)
    }

    #[test]
    fn register_user_derives_tier_from_default_score() {
        let (service, _) = service();
        let record = service.register_user(UserId::from("u1"), now()).unwrap();
        assert_eq!(record.authenticity_score, 50);
        assert_eq!(record.trust_tier, TrustTier::Silver);
        assert_eq!(record.status, AccountStatus::Active);
    }

    #[test]
    fn record_ad_commits_the_write_even_when_the_probe_trips() {
        let (service, store) = service();
        let user = UserId::from("u1");
        service.register_user(user.clone(), now()).unwrap();

        for i in 0..3 {
            service
                .record_ad(&user, now() + Duration::minutes(i))
                .unwrap();
        }

        // All three ads persisted; the probe tripped on the third.
        assert_eq!(
            store
                .count_since(&user, ActivityKind::AdSubmission, now())
                .unwrap(),
            3
        );
        let view = service.reputation_of(&user).unwrap().unwrap();
        assert_eq!(view.fraud_flags, 1);
        assert_eq!(view.authenticity_score, 45);
    }

    #[test]
    fn reputation_of_unknown_user_is_none() {
        let (service, _) = service();
        assert!(service.reputation_of(&UserId::from("ghost")).unwrap().is_none());
    }
}
