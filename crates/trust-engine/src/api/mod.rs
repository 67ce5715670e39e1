pub mod service;

pub use service::{ReputationView, TrustService};
