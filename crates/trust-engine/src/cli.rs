//! Operator CLI over a JSON state snapshot.
//!
//! One command per process: state is loaded from the snapshot file, the
//! command runs against the in-memory reference store, and the snapshot is
//! written back. The CLI is the only place that reads the wall clock; the
//! library takes `now` as an argument everywhere.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::api::TrustService;
use crate::config::TrustPolicyConfig;
use crate::fraud::{FlagRequest, RuleCatalog};
use crate::storage::{MemoryStore, Severity, UserId};

/// venturelink-trust: fraud scoring and trust tiers for the VentureLink
/// platform backend.
#[derive(Debug, Parser)]
#[command(name = "venturelink-trust", version, about, propagate_version = true)]
pub struct Cli {
    /// Path to the JSON state snapshot.
    #[arg(long, default_value = "trust_state.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a user record with the default score.
    AddUser { user: String },

    /// Record an ad submission and run the rapid-submission probe.
    Ad { user: String },

    /// Record a message send and run the spam probe.
    Message { user: String },

    /// Apply a manual score adjustment.
    Adjust {
        user: String,
        delta: i32,
        #[arg(long, default_value = "manual adjustment")]
        reason: String,
    },

    /// Record a fraud flag directly.
    Flag {
        user: String,
        reason: String,
        #[arg(long, value_enum, default_value = "low")]
        severity: SeverityArg,
    },

    /// File a report against a user and/or an idea posting.
    Report {
        reporter: String,
        reason: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        idea: Option<String>,
    },

    /// List all reports, newest first.
    Reports,

    /// Review a report and record the action taken.
    Review {
        report_id: Uuid,
        #[arg(long, value_enum)]
        severity: SeverityArg,
        #[arg(long)]
        action: String,
    },

    /// Mark a fraud event resolved.
    Resolve { event_id: Uuid },

    /// Lift a suspension.
    Reinstate { user: String },

    /// Show a user's reputation view.
    Score { user: String },

    /// List a user's fraud events, newest first.
    Events { user: String },

    /// Print the active rule catalog.
    Rules,
}

pub fn run(cli: Cli) -> Result<()> {
    let store = Arc::new(
        MemoryStore::load_or_default(&cli.state)
            .with_context(|| format!("failed loading state from {}", cli.state.display()))?,
    );
    let service = TrustService::new(
        store.clone(),
        TrustPolicyConfig::default(),
        RuleCatalog::default(),
    );
    let now = Utc::now();

    match cli.command {
        Command::AddUser { user } => {
            let record = service.register_user(UserId::new(user), now)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Ad { user } => {
            service.record_ad(&UserId::new(user), now)?;
            println!("ad submission recorded");
        }
        Command::Message { user } => {
            service.record_message(&UserId::new(user), now)?;
            println!("message send recorded");
        }
        Command::Adjust {
            user,
            delta,
            reason,
        } => {
            service.adjust_score(&UserId::new(user), delta, &reason)?;
            println!("score adjusted");
        }
        Command::Flag {
            user,
            reason,
            severity,
        } => {
            service.flag_user(
                FlagRequest::system(UserId::new(user), reason).with_severity(severity.into()),
                now,
            )?;
            println!("flag recorded");
        }
        Command::Report {
            reporter,
            reason,
            user,
            idea,
        } => {
            let report = service.moderation().file_report(
                UserId::new(reporter),
                user.map(UserId::new),
                idea,
                reason,
                now,
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Reports => {
            let reports = service.moderation().list_reports()?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Review {
            report_id,
            severity,
            action,
        } => {
            service
                .moderation()
                .take_action(report_id, severity.into(), action, now)?;
            println!("action recorded");
        }
        Command::Resolve { event_id } => {
            service.moderation().resolve_event(event_id)?;
            println!("event resolved");
        }
        Command::Reinstate { user } => {
            service.moderation().reinstate(&UserId::new(user))?;
            println!("user reinstated");
        }
        Command::Score { user } => {
            let user = UserId::new(user);
            let Some(view) = service.reputation_of(&user)? else {
                bail!("user `{user}` not found");
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Events { user } => {
            let events = service.events_for(&UserId::new(user))?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Command::Rules => {
            println!("{}", serde_json::to_string_pretty(&RuleCatalog::default())?);
        }
    }

    store
        .save(&cli.state)
        .with_context(|| format!("failed writing state to {}", cli.state.display()))?;
    Ok(())
}
