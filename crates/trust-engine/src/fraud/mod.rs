pub mod escalation;
pub mod probes;
pub mod recorder;
pub mod rules;

pub use escalation::{Escalation, escalate};
pub use probes::BehaviorProbes;
pub use recorder::{FlagRequest, FraudRecorder};
pub use rules::{ClaimRule, CountRule, RuleCatalog};
