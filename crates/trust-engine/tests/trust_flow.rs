//! End-to-end scenarios over the full service wiring.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use venturelink_trust::api::TrustService;
use venturelink_trust::config::TrustPolicyConfig;
use venturelink_trust::fraud::{FlagRequest, RuleCatalog};
use venturelink_trust::reputation::TrustTier;
use venturelink_trust::storage::{
    AccountStatus, FlagSource, MemoryStore, ReportStore, Severity, UserId, UserStore,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn service() -> (TrustService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = TrustService::new(
        store.clone(),
        TrustPolicyConfig::default(),
        RuleCatalog::default(),
    );
    (service, store)
}

#[test]
fn message_spam_flags_on_the_tenth_send() {
    let (service, _) = service();
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();

    // Ten sends inside four minutes: the tenth trips MESSAGE_SPAM.
    for i in 0..10 {
        service
            .record_message(&user, start() + Duration::seconds(i * 24))
            .unwrap();
    }

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 1);
    assert_eq!(view.authenticity_score, 45);
    assert_eq!(view.trust_tier, TrustTier::Silver);
    assert_eq!(view.status, AccountStatus::Active);

    let events = service.events_for(&user).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, "Spam messaging detected");
    assert_eq!(events[0].severity, Severity::Low);
    assert_eq!(events[0].source, FlagSource::System);

    // An eleventh send in the same window flags again; two flags is still
    // well below the critical threshold, so the account stays active.
    service
        .record_message(&user, start() + Duration::minutes(4) + Duration::seconds(30))
        .unwrap();

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 2);
    assert_eq!(view.authenticity_score, 40);
    assert_eq!(view.status, AccountStatus::Active);
}

#[test]
fn messages_outside_the_window_never_flag() {
    let (service, _) = service();
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();

    // Ten sends, six minutes apart: each probe sees only the current one.
    for i in 0..10 {
        service
            .record_message(&user, start() + Duration::minutes(i * 6))
            .unwrap();
    }

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 0);
    assert_eq!(view.authenticity_score, 50);
}

#[test]
fn fourth_flag_suspends_and_the_fifth_stays_immediate_only() {
    let (service, _) = service();
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();

    for i in 0..4 {
        service
            .flag_user(
                FlagRequest::system(user.clone(), "Spam messaging detected"),
                start() + Duration::minutes(i),
            )
            .unwrap();
    }

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 4);
    assert_eq!(view.status, AccountStatus::Suspended);
    // Four immediate penalties plus the critical one: 50 - 20 - 30 = 0.
    assert_eq!(view.authenticity_score, 0);
    assert_eq!(view.trust_tier, TrustTier::Bronze);
    assert_eq!(view.last_fraud_at, Some(start() + Duration::minutes(3)));

    // The fifth flag past the threshold is recorded but the critical
    // penalty and suspension do not re-fire.
    service
        .flag_user(
            FlagRequest::system(user.clone(), "Spam messaging detected"),
            start() + Duration::minutes(10),
        )
        .unwrap();

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 5);
    assert_eq!(view.negative_flags, 6);
    assert_eq!(view.status, AccountStatus::Suspended);
    assert_eq!(service.events_for(&user).unwrap().len(), 5);
}

#[test]
fn reinstated_account_rearms_the_critical_escalation() {
    let (service, store) = service();
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();

    for i in 0..4 {
        service
            .flag_user(
                FlagRequest::system(user.clone(), "Spam messaging detected"),
                start() + Duration::minutes(i),
            )
            .unwrap();
    }
    assert_eq!(
        service.reputation_of(&user).unwrap().unwrap().status,
        AccountStatus::Suspended
    );

    service.moderation().reinstate(&user).unwrap();
    service.adjust_score(&user, 60, "appeal accepted").unwrap();

    service
        .flag_user(
            FlagRequest::system(user.clone(), "Spam messaging detected"),
            start() + Duration::hours(1),
        )
        .unwrap();

    let record = store.get(&user).unwrap().unwrap();
    assert_eq!(record.status, AccountStatus::Suspended);
    // Fresh crossing applies both deltas again: 60 - 5 - 30 = 25.
    assert_eq!(record.authenticity_score, 25);
}

#[test]
fn manual_report_review_and_resolution() {
    let (service, store) = service();
    let reporter = UserId::from("investor-2");
    let founder = UserId::from("founder-7");
    service.register_user(reporter.clone(), start()).unwrap();
    service.register_user(founder.clone(), start()).unwrap();

    // Another user reports the founder; that alone is one MEDIUM flag.
    service
        .moderation()
        .report_user(
            reporter.clone(),
            founder.clone(),
            "Unverified or misleading claims",
            start(),
        )
        .unwrap();

    let view = service.reputation_of(&founder).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 1);
    assert_eq!(view.status, AccountStatus::Active);

    let events = service.events_for(&founder).unwrap();
    assert_eq!(events[0].source, FlagSource::User);
    assert_eq!(events[0].reported_by, Some(reporter.clone()));

    // The admin reviews a filed report at HIGH severity: suspension.
    let report = service
        .moderation()
        .file_report(
            reporter,
            Some(founder.clone()),
            None,
            "Unverified or misleading claims",
            start() + Duration::minutes(5),
        )
        .unwrap();
    service
        .moderation()
        .take_action(
            report.report_id,
            Severity::High,
            "account suspended",
            start() + Duration::minutes(6),
        )
        .unwrap();

    assert_eq!(
        service.reputation_of(&founder).unwrap().unwrap().status,
        AccountStatus::Suspended
    );
    let flags = store.moderation_flags_for(&founder).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].action_taken, "account suspended");

    // Moderation resolves the original fraud event; nothing else on the
    // event changes.
    service
        .moderation()
        .resolve_event(events[0].event_id)
        .unwrap();
    let events = service.events_for(&founder).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].resolved);
    assert_eq!(events[0].severity, Severity::Medium);
}

#[test]
fn flagging_an_unknown_user_is_inert() {
    let (service, _) = service();
    service
        .flag_user(
            FlagRequest::system(UserId::from("ghost"), "Spam messaging detected"),
            start(),
        )
        .unwrap();
    assert!(service.events_for(&UserId::from("ghost")).unwrap().is_empty());
    assert!(service.reputation_of(&UserId::from("ghost")).unwrap().is_none());
}

#[test]
fn snapshot_round_trip_preserves_reputation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trust_state.json");

    let (service, store) = service();
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();
    service
        .flag_user(
            FlagRequest::system(user.clone(), "Spam messaging detected"),
            start(),
        )
        .unwrap();
    store.save(&path).unwrap();

    let reloaded = Arc::new(MemoryStore::load(&path).unwrap());
    let service = TrustService::new(
        reloaded,
        TrustPolicyConfig::default(),
        RuleCatalog::default(),
    );
    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.fraud_flags, 1);
    assert_eq!(view.authenticity_score, 45);
    assert_eq!(view.trust_tier, TrustTier::Silver);
}

#[test]
fn tightened_config_suspends_sooner() {
    let store = Arc::new(MemoryStore::new());
    let service = TrustService::new(
        store,
        TrustPolicyConfig {
            flags_critical: 2,
            ..TrustPolicyConfig::default()
        },
        RuleCatalog::default(),
    );
    let user = UserId::from("founder-7");
    service.register_user(user.clone(), start()).unwrap();

    for i in 0..2 {
        service
            .flag_user(
                FlagRequest::system(user.clone(), "Spam messaging detected"),
                start() + Duration::minutes(i),
            )
            .unwrap();
    }

    let view = service.reputation_of(&user).unwrap().unwrap();
    assert_eq!(view.status, AccountStatus::Suspended);
}
