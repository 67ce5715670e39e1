//! Discrete trust tiers derived from the authenticity score.
//!
//! The tier is never stored as an independent source of truth: it is
//! recomputed from the score on every mutation and at record creation, so
//! `record.trust_tier == TrustTier::for_score(record.authenticity_score)`
//! holds whenever a record is observable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reputation bucket shown to other users of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrustTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl TrustTier {
    /// Derive the tier for a score, evaluated highest-first.
    #[must_use]
    pub fn for_score(score: i32) -> Self {
        if score >= 80 {
            Self::Platinum
        } else if score >= 60 {
            Self::Gold
        } else if score >= 40 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
