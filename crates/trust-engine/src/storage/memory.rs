//! In-memory reference implementation of the store traits.
//!
//! A single mutex guards the whole dataset, so every trait method is one
//! atomic storage operation. In particular `increment_fraud_flags` reads
//! and writes the counter under one lock acquisition, which is the
//! increment-and-fetch primitive the escalation path relies on.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reputation::TrustTier;

use super::{
    AccountStatus, ActivityKind, ActivityRecord, ActivityStore, FraudEvent, FraudEventStore,
    ModerationFlag, Report, ReportStore, StoreError, UserId, UserRecord, UserStore,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct MemoryInner {
    pub(crate) users: BTreeMap<UserId, UserRecord>,
    pub(crate) activity: BTreeMap<UserId, Vec<ActivityRecord>>,
    pub(crate) events: Vec<FraudEvent>,
    pub(crate) reports: Vec<Report>,
    pub(crate) moderation_flags: Vec<ModerationFlag>,
}

/// Shared in-memory store. `Send + Sync`; clones of the `Arc` wrapping it
/// see the same data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_inner(inner: MemoryInner) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    /// Number of user records, for CLI summaries.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

impl UserStore for MemoryStore {
    fn get(&self, user: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock().users.get(user).cloned())
    }

    fn insert(&self, record: UserRecord) -> Result<(), StoreError> {
        self.lock().users.insert(record.user_id.clone(), record);
        Ok(())
    }

    fn update_reputation(
        &self,
        user: &UserId,
        score: i32,
        tier: TrustTier,
        negative_flags: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let record = inner
            .users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?;
        record.authenticity_score = score;
        record.trust_tier = tier;
        record.negative_flags = negative_flags;
        Ok(())
    }

    fn increment_fraud_flags(&self, user: &UserId, at: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let record = inner
            .users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?;
        record.fraud_flags = record.fraud_flags.saturating_add(1);
        record.last_fraud_at = Some(at);
        Ok(record.fraud_flags)
    }

    fn set_status(&self, user: &UserId, status: AccountStatus) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let record = inner
            .users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?;
        record.status = status;
        Ok(())
    }
}

impl ActivityStore for MemoryStore {
    fn record_activity(
        &self,
        user: &UserId,
        kind: ActivityKind,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.lock()
            .activity
            .entry(user.clone())
            .or_default()
            .push(ActivityRecord { kind, at });
        Ok(())
    }

    fn count_since(
        &self,
        user: &UserId,
        kind: ActivityKind,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let inner = self.lock();
        let count = inner
            .activity
            .get(user)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.kind == kind && r.at >= cutoff)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }
}

impl FraudEventStore for MemoryStore {
    fn insert_event(&self, event: FraudEvent) -> Result<(), StoreError> {
        self.lock().events.push(event);
        Ok(())
    }

    fn events_for(&self, user: &UserId) -> Result<Vec<FraudEvent>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .events
            .iter()
            .filter(|e| &e.reported_user == user)
            .rev()
            .cloned()
            .collect())
    }

    fn resolve_event(&self, event_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let event = inner
            .events
            .iter_mut()
            .find(|e| e.event_id == event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        event.resolved = true;
        Ok(())
    }
}

impl ReportStore for MemoryStore {
    fn insert_report(&self, report: Report) -> Result<(), StoreError> {
        self.lock().reports.push(report);
        Ok(())
    }

    fn get_report(&self, report_id: Uuid) -> Result<Option<Report>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .reports
            .iter()
            .find(|r| r.report_id == report_id)
            .cloned())
    }

    fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        let inner = self.lock();
        Ok(inner.reports.iter().rev().cloned().collect())
    }

    fn mark_reviewed(&self, report_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let report = inner
            .reports
            .iter_mut()
            .find(|r| r.report_id == report_id)
            .ok_or(StoreError::ReportNotFound(report_id))?;
        report.status = super::ReportStatus::Reviewed;
        Ok(())
    }

    fn insert_moderation_flag(&self, flag: ModerationFlag) -> Result<(), StoreError> {
        self.lock().moderation_flags.push(flag);
        Ok(())
    }

    fn moderation_flags_for(&self, user: &UserId) -> Result<Vec<ModerationFlag>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .moderation_flags
            .iter()
            .filter(|f| &f.user == user)
            .rev()
            .cloned()
            .collect())
    }
}
