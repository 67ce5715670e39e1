#![forbid(unsafe_code)]

//! Fraud scoring and trust-tier engine for the VentureLink platform backend.
//!
//! Inspects user behavior on the platform's write paths (ad submissions,
//! direct messages), records immutable fraud evidence, and maintains a
//! bounded per-user authenticity score with escalating consequences:
//! flag, score penalty, suspension.
//!
//! The HTTP layer, session handling, and the document store proper are
//! collaborators, not residents: this crate talks to them through the
//! storage traits in [`storage`] and exposes two fire-and-forget entry
//! points (`adjust_score`, `flag_user`) plus read views through
//! [`api::service::TrustService`].

pub mod api;
pub mod cli;
pub mod config;
pub mod fraud;
pub mod moderation;
pub mod reputation;
pub mod storage;
