//! Report queue and admin moderation actions.
//!
//! Users file reports against other users or idea postings; an admin
//! reviews a report, records the action taken as a moderation flag, and
//! suspends the account outright on HIGH severity. Moderation is also the
//! only path that resolves fraud events and the only path that lifts a
//! suspension, which re-arms the one-shot critical escalation.
//!
//! Log codes:
//! - `TRUST-MOD-001`: report filed
//! - `TRUST-MOD-002`: action taken on a report
//! - `TRUST-MOD-003`: user reinstated

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::fraud::{FlagRequest, FraudRecorder};
use crate::storage::{
    AccountStatus, FraudEventStore, ModerationFlag, Report, ReportStatus, ReportStore, Severity,
    StoreError, UserId, UserStore,
};

pub const MOD_REPORT_FILED: &str = "TRUST-MOD-001";
pub const MOD_ACTION_TAKEN: &str = "TRUST-MOD-002";
pub const MOD_USER_REINSTATED: &str = "TRUST-MOD-003";

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("report must name a user or an idea")]
    EmptyTarget,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Admin-facing moderation surface over the report and event stores.
#[derive(Clone)]
pub struct ModerationQueue {
    users: Arc<dyn UserStore>,
    events: Arc<dyn FraudEventStore>,
    reports: Arc<dyn ReportStore>,
    recorder: FraudRecorder,
}

impl ModerationQueue {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn FraudEventStore>,
        reports: Arc<dyn ReportStore>,
        recorder: FraudRecorder,
    ) -> Self {
        Self {
            users,
            events,
            reports,
            recorder,
        }
    }

    /// File a report against a user and/or an idea posting.
    pub fn file_report(
        &self,
        reported_by: UserId,
        reported_user: Option<UserId>,
        reported_idea: Option<String>,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Report, ModerationError> {
        if reported_user.is_none() && reported_idea.is_none() {
            return Err(ModerationError::EmptyTarget);
        }

        let report = Report {
            report_id: Uuid::new_v4(),
            reported_user,
            reported_idea,
            reported_by,
            reason: reason.into(),
            status: ReportStatus::Open,
            created_at: now,
        };
        self.reports.insert_report(report.clone())?;

        info!(
            code = MOD_REPORT_FILED,
            report = %report.report_id,
            reporter = %report.reported_by,
            "report filed"
        );
        Ok(report)
    }

    /// All reports, newest first.
    pub fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        self.reports.list_reports()
    }

    /// Review a report: mark it reviewed, record the action as a moderation
    /// flag against the reported user, and suspend on HIGH severity.
    pub fn take_action(
        &self,
        report_id: Uuid,
        severity: Severity,
        action: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ModerationError> {
        let report = self
            .reports
            .get_report(report_id)?
            .ok_or(StoreError::ReportNotFound(report_id))?;

        self.reports.mark_reviewed(report_id)?;

        if let Some(user) = report.reported_user {
            let action = action.into();
            self.reports.insert_moderation_flag(ModerationFlag {
                flag_id: Uuid::new_v4(),
                user: user.clone(),
                reason: report.reason.clone(),
                severity,
                action_taken: action.clone(),
                created_at: now,
            })?;

            if severity == Severity::High {
                match self.users.set_status(&user, AccountStatus::Suspended) {
                    // Account removed since the report: the review still lands.
                    Err(StoreError::UserNotFound(_)) => {}
                    other => other?,
                }
            }

            info!(
                code = MOD_ACTION_TAKEN,
                report = %report_id,
                user = %user,
                severity = %severity,
                action = %action,
                "action taken on report"
            );
        }

        Ok(())
    }

    /// Manual user-report path: counts as a fraud flag with USER source.
    pub fn report_user(
        &self,
        reported_by: UserId,
        user: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.recorder
            .flag_user(FlagRequest::user_report(user, reported_by, reason), now)
    }

    /// Flip `resolved` on a fraud event.
    pub fn resolve_event(&self, event_id: Uuid) -> Result<(), StoreError> {
        self.events.resolve_event(event_id)
    }

    /// Lift a suspension, re-arming the critical escalation path.
    pub fn reinstate(&self, user: &UserId) -> Result<(), StoreError> {
        self.users.set_status(user, AccountStatus::Active)?;
        info!(code = MOD_USER_REINSTATED, user = %user, "user reinstated");
        Ok(())
    }
}
