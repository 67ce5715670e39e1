//! Fraud flag recorder: one entry point per suspicious event.
//!
//! Ordering per flag: atomic counter increment (fetching the post-increment
//! count), immutable event insert, immediate penalty, escalation check.
//! Fraud detection must never fail the triggering request for policy
//! reasons — a missing user skips every sub-step — but a persistence
//! failure at any sub-step propagates to the caller.
//!
//! Log codes:
//! - `TRUST-FRAUD-001`: flag recorded
//! - `TRUST-FRAUD-002`: warning threshold reached
//! - `TRUST-FRAUD-003`: critical threshold crossed, account suspended

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TrustPolicyConfig;
use crate::reputation::ScoreLedger;
use crate::storage::{
    AccountStatus, FlagSource, FraudEvent, FraudEventStore, Severity, StoreError, UserId, UserStore,
};

use super::escalation::escalate;

pub const FRAUD_FLAG_RECORDED: &str = "TRUST-FRAUD-001";
pub const FRAUD_WARNING_REACHED: &str = "TRUST-FRAUD-002";
pub const FRAUD_ACCOUNT_SUSPENDED: &str = "TRUST-FRAUD-003";

/// Ledger reasons for the two fixed penalties.
pub const REASON_SPAM_ACTIVITY: &str = "spam activity";
pub const REASON_FRAUD_CONFIRMED: &str = "fraud confirmed";

/// One suspicious event to record against a user.
#[derive(Debug, Clone)]
pub struct FlagRequest {
    pub user_id: UserId,
    pub reason: String,
    pub severity: Severity,
    pub source: FlagSource,
    pub reported_by: Option<UserId>,
}

impl FlagRequest {
    /// System-detected flag with the default severity.
    #[must_use]
    pub fn system(user_id: UserId, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
            severity: Severity::Low,
            source: FlagSource::System,
            reported_by: None,
        }
    }

    /// Manual report filed by another user.
    #[must_use]
    pub fn user_report(user_id: UserId, reported_by: UserId, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
            severity: Severity::Medium,
            source: FlagSource::User,
            reported_by: Some(reported_by),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Records flags and drives the escalation policy.
#[derive(Clone)]
pub struct FraudRecorder {
    users: Arc<dyn UserStore>,
    events: Arc<dyn FraudEventStore>,
    ledger: ScoreLedger,
    config: TrustPolicyConfig,
}

impl FraudRecorder {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn FraudEventStore>,
        ledger: ScoreLedger,
        config: TrustPolicyConfig,
    ) -> Self {
        Self {
            users,
            events,
            ledger,
            config,
        }
    }

    /// Record one flag against a user and apply the resulting penalties.
    pub fn flag_user(&self, request: FlagRequest, now: DateTime<Utc>) -> Result<(), StoreError> {
        // Existence check first: a missing user skips every sub-step,
        // including the event insert.
        let Some(record) = self.users.get(&request.user_id)? else {
            return Ok(());
        };

        let flags = self.users.increment_fraud_flags(&request.user_id, now)?;

        self.events.insert_event(FraudEvent {
            event_id: Uuid::new_v4(),
            reported_user: request.user_id.clone(),
            reported_by: request.reported_by.clone(),
            reason: request.reason.clone(),
            severity: request.severity,
            source: request.source,
            resolved: false,
            created_at: now,
        })?;

        info!(
            code = FRAUD_FLAG_RECORDED,
            user = %request.user_id,
            flags,
            severity = %request.severity,
            reason = %request.reason,
            "fraud flag recorded"
        );

        let decision = escalate(
            flags,
            record.status == AccountStatus::Suspended,
            &self.config,
        );

        self.ledger
            .adjust(&request.user_id, decision.immediate_delta, REASON_SPAM_ACTIVITY)?;

        if decision.warning {
            warn!(
                code = FRAUD_WARNING_REACHED,
                user = %request.user_id,
                flags,
                "fraud flag count reached the warning threshold"
            );
        }

        if decision.suspend {
            if let Some(delta) = decision.critical_delta {
                self.ledger
                    .adjust(&request.user_id, delta, REASON_FRAUD_CONFIRMED)?;
            }
            self.users
                .set_status(&request.user_id, AccountStatus::Suspended)?;
            warn!(
                code = FRAUD_ACCOUNT_SUSPENDED,
                user = %request.user_id,
                flags,
                "critical threshold crossed, account suspended"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::storage::{MemoryStore, UserRecord};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn recorder() -> (FraudRecorder, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(UserRecord::new(UserId::from("u1"), 50, now()))
            .unwrap();
        let ledger = ScoreLedger::new(store.clone());
        let recorder = FraudRecorder::new(
            store.clone(),
            store.clone(),
            ledger,
            TrustPolicyConfig::default(),
        );
        (recorder, store)
    }

    fn flag(recorder: &FraudRecorder) {
        recorder
            .flag_user(FlagRequest::system(UserId::from("u1"), "Spam messaging detected"), now())
            .unwrap();
    }

    #[test]
    fn first_flag_applies_immediate_penalty_only() {
        let (recorder, store) = recorder();
        flag(&recorder);

        let record = store.get(&UserId::from("u1")).unwrap().unwrap();
        assert_eq!(record.fraud_flags, 1);
        assert_eq!(record.authenticity_score, 45);
        assert_eq!(record.negative_flags, 1);
        assert_eq!(record.status, AccountStatus::Active);
        assert_eq!(record.last_fraud_at, Some(now()));

        let events = store.events_for(&UserId::from("u1")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, FlagSource::System);
        assert!(!events[0].resolved);
    }

    #[test]
    fn fourth_flag_suspends_and_applies_critical_penalty() {
        let (recorder, store) = recorder();
        for _ in 0..4 {
            flag(&recorder);
        }

        let record = store.get(&UserId::from("u1")).unwrap().unwrap();
        assert_eq!(record.fraud_flags, 4);
        // 4 immediate penalties plus the critical one: 50 - 4*5 - 30 = 0.
        assert_eq!(record.authenticity_score, 0);
        assert_eq!(record.status, AccountStatus::Suspended);
        // One negative-flag count per adjustment, including the critical.
        assert_eq!(record.negative_flags, 5);
    }

    #[test]
    fn fifth_flag_does_not_refire_the_critical_path() {
        let (recorder, store) = recorder();
        for _ in 0..5 {
            flag(&recorder);
        }

        let record = store.get(&UserId::from("u1")).unwrap().unwrap();
        assert_eq!(record.fraud_flags, 5);
        assert_eq!(record.status, AccountStatus::Suspended);
        // Only the immediate penalty on the fifth call.
        assert_eq!(record.negative_flags, 6);
        assert_eq!(record.authenticity_score, 0);

        let events = store.events_for(&UserId::from("u1")).unwrap();
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn reinstated_user_can_cross_the_threshold_again() {
        let (recorder, store) = recorder();
        for _ in 0..4 {
            flag(&recorder);
        }
        store
            .set_status(&UserId::from("u1"), AccountStatus::Active)
            .unwrap();
        store
            .update_reputation(&UserId::from("u1"), 60, crate::reputation::TrustTier::Gold, 5)
            .unwrap();

        flag(&recorder);
        let record = store.get(&UserId::from("u1")).unwrap().unwrap();
        assert_eq!(record.status, AccountStatus::Suspended);
        // Immediate plus critical on the fresh crossing: 60 - 5 - 30 = 25.
        assert_eq!(record.authenticity_score, 25);
    }

    #[test]
    fn missing_user_records_nothing() {
        let (recorder, store) = recorder();
        recorder
            .flag_user(
                FlagRequest::system(UserId::from("ghost"), "Spam messaging detected"),
                now(),
            )
            .unwrap();
        assert!(store.events_for(&UserId::from("ghost")).unwrap().is_empty());
    }

    #[test]
    fn user_report_carries_reporter_and_source() {
        let (recorder, store) = recorder();
        recorder
            .flag_user(
                FlagRequest::user_report(
                    UserId::from("u1"),
                    UserId::from("reporter"),
                    "Unverified or misleading claims",
                )
                .with_severity(Severity::High),
                now(),
            )
            .unwrap();

        let events = store.events_for(&UserId::from("u1")).unwrap();
        assert_eq!(events[0].source, FlagSource::User);
        assert_eq!(events[0].reported_by, Some(UserId::from("reporter")));
        assert_eq!(events[0].severity, Severity::High);
    }
}
