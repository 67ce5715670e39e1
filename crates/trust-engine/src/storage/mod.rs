//! Storage boundary between the trust engine and the platform's document
//! store.
//!
//! The engine never talks to the real persistence layer directly; it goes
//! through the traits below. [`memory::MemoryStore`] is the reference
//! implementation used by tests and the operator CLI, with a JSON snapshot
//! layer in [`snapshot`] so CLI invocations compose across processes.
//!
//! Counter updates that feed escalation decisions must be atomic at the
//! store: `increment_fraud_flags` performs the increment and returns the
//! post-increment value in one storage operation, so two concurrent flags
//! cannot both observe the same pre-increment count.

pub mod memory;
pub mod snapshot;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reputation::TrustTier;

pub use memory::MemoryStore;

// ── Identifiers ────────────────────────────────────────────────────────────

/// Opaque user identifier issued by the (external) auth layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// ── User reputation record ─────────────────────────────────────────────────

/// Account lifecycle state. `Suspended` is the terminal consequence of the
/// escalation policy; `Deleted` records are kept for audit joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Suspended,
    Deleted,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Deleted => "DELETED",
        };
        f.write_str(label)
    }
}

/// The reputation subset of the user entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    /// Bounded authenticity score, 0–100 inclusive.
    pub authenticity_score: i32,
    /// Always `TrustTier::for_score(authenticity_score)`.
    pub trust_tier: TrustTier,
    /// How many times a penalty occurred, not how large.
    pub negative_flags: u64,
    /// One per detected rule violation or manual report.
    pub fraud_flags: u64,
    pub last_fraud_at: Option<DateTime<Utc>>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a fresh record with the tier derived from the starting score.
    #[must_use]
    pub fn new(user_id: UserId, score: i32, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            authenticity_score: score,
            trust_tier: TrustTier::for_score(score),
            negative_flags: 0,
            fraud_flags: 0,
            last_fraud_at: None,
            status: AccountStatus::Active,
            created_at: now,
        }
    }
}

// ── Fraud event record ─────────────────────────────────────────────────────

/// Severity attached to a detected violation or manual report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// Who produced the flag: an automated probe or another user's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlagSource {
    System,
    User,
}

/// Immutable audit record of one suspicious event. Only `resolved` may be
/// mutated after creation, through the moderation workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudEvent {
    pub event_id: Uuid,
    pub reported_user: UserId,
    /// `None` = system-detected.
    pub reported_by: Option<UserId>,
    pub reason: String,
    pub severity: Severity,
    pub source: FlagSource,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

// ── Activity records ───────────────────────────────────────────────────────

/// Kinds of user writes the behavior probes count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    AdSubmission,
    MessageSend,
}

/// One user write, as the probes see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
}

// ── Moderation records ─────────────────────────────────────────────────────

/// Review state of a user-filed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Open,
    Reviewed,
}

/// A user-filed report against another user and/or an idea posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: Uuid,
    pub reported_user: Option<UserId>,
    pub reported_idea: Option<String>,
    pub reported_by: UserId,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Record of an admin action taken on a reviewed report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationFlag {
    pub flag_id: Uuid,
    pub user: UserId,
    pub reason: String,
    pub severity: Severity,
    pub action_taken: String,
    pub created_at: DateTime<Utc>,
}

// ── Errors ─────────────────────────────────────────────────────────────────

/// Persistence-layer failures. `UserNotFound` is absorbed by the score
/// ledger and flag recorder (best-effort side channel); everything else
/// propagates to the caller as an infrastructure error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user `{0}` not found")]
    UserNotFound(UserId),
    #[error("report `{0}` not found")]
    ReportNotFound(Uuid),
    #[error("fraud event `{0}` not found")]
    EventNotFound(Uuid),
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding: {0}")]
    Serde(#[from] serde_json::Error),
}

// ── Store traits ───────────────────────────────────────────────────────────

/// User store keyed by user identifier.
pub trait UserStore: Send + Sync {
    fn get(&self, user: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a record, replacing any existing one for the same id.
    fn insert(&self, record: UserRecord) -> Result<(), StoreError>;

    /// Persist score, tier, and negative-flag counter as a single update.
    fn update_reputation(
        &self,
        user: &UserId,
        score: i32,
        tier: TrustTier,
        negative_flags: u64,
    ) -> Result<(), StoreError>;

    /// Atomically increment the fraud-flag counter, stamp `last_fraud_at`,
    /// and return the post-increment count.
    fn increment_fraud_flags(&self, user: &UserId, at: DateTime<Utc>) -> Result<u64, StoreError>;

    fn set_status(&self, user: &UserId, status: AccountStatus) -> Result<(), StoreError>;
}

/// Store owning the write-path artifacts (ads, messages) the probes count.
pub trait ActivityStore: Send + Sync {
    fn record_activity(
        &self,
        user: &UserId,
        kind: ActivityKind,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Count the user's writes of `kind` with `at >= cutoff` (inclusive).
    fn count_since(
        &self,
        user: &UserId,
        kind: ActivityKind,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}

/// Append-only fraud event audit trail.
pub trait FraudEventStore: Send + Sync {
    fn insert_event(&self, event: FraudEvent) -> Result<(), StoreError>;

    /// All events for a user, newest first.
    fn events_for(&self, user: &UserId) -> Result<Vec<FraudEvent>, StoreError>;

    /// Flip `resolved` on an event; the only mutation events admit.
    fn resolve_event(&self, event_id: Uuid) -> Result<(), StoreError>;
}

/// User-filed reports and the admin actions taken on them.
pub trait ReportStore: Send + Sync {
    fn insert_report(&self, report: Report) -> Result<(), StoreError>;

    fn get_report(&self, report_id: Uuid) -> Result<Option<Report>, StoreError>;

    /// All reports, newest first.
    fn list_reports(&self) -> Result<Vec<Report>, StoreError>;

    fn mark_reviewed(&self, report_id: Uuid) -> Result<(), StoreError>;

    fn insert_moderation_flag(&self, flag: ModerationFlag) -> Result<(), StoreError>;

    fn moderation_flags_for(&self, user: &UserId) -> Result<Vec<ModerationFlag>, StoreError>;
}
