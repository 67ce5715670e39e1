pub mod ledger;
pub mod tier;

pub use ledger::{SCORE_MAX, SCORE_MIN, ScoreLedger};
pub use tier::TrustTier;
