mod common;

use common::{count_signals, day, make_store, make_store_with, record_changes, sticky_settings};
use cyberqr::progression::{badges, level_for_xp, ScanOutcome};
use cyberqr::store::Signal;
use cyberqr::StoreError;

#[test]
fn xp_scenario_levels_up_exactly_once() {
    let (store, _clock) = make_store();
    let log = record_changes(&store);

    assert_eq!(store.add_xp(50).unwrap(), None);
    let state = store.get_state();
    assert_eq!(state.user.xp(), 50);
    assert_eq!(state.user.level(), 1);
    assert_eq!(count_signals(&log, |s| matches!(s, Signal::LevelUp { .. })), 0);

    assert_eq!(store.add_xp(60).unwrap(), Some((1, 2)));
    let state = store.get_state();
    assert_eq!(state.user.xp(), 110);
    assert_eq!(state.user.level(), 2);
    assert_eq!(count_signals(&log, |s| matches!(s, Signal::LevelUp { .. })), 1);
}

#[test]
fn level_tracks_xp_after_every_call() {
    let (store, _clock) = make_store();
    let amounts = [1u32, 99, 100, 37, 263, 5, 1000];
    let mut total = 0u64;

    for amount in amounts {
        store.add_xp(amount).unwrap();
        total += u64::from(amount);
        let user = store.get_state().user;
        assert_eq!(user.xp(), total);
        assert_eq!(user.level(), level_for_xp(user.xp()));
    }
}

#[test]
fn level_up_queues_companion_message() {
    let (store, _clock) = make_store();
    store.add_xp(250).unwrap();

    let visible = store.get_state().notifications.visible.expect("level-up message");
    assert!(visible.text.contains("level 3"));
}

#[test]
fn zero_xp_is_rejected_without_notification() {
    let (store, _clock) = make_store();
    let log = record_changes(&store);

    let err = store.add_xp(0).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert_eq!(store.get_state().user.xp(), 0);
    assert!(log.lock().is_empty());
}

#[test]
fn award_badge_is_idempotent() {
    let (store, _clock) = make_store();
    let log = record_changes(&store);

    assert!(store.award_badge("early-bird").unwrap());
    let once = store.get_state().user.badges().clone();
    assert!(!store.award_badge("early-bird").unwrap());

    assert_eq!(store.get_state().user.badges(), &once);
    assert_eq!(once.len(), 1);
    assert_eq!(
        count_signals(&log, |s| matches!(s, Signal::BadgeUnlocked { .. })),
        1
    );
    // The repeat award changed nothing, so nobody was told about it
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn blank_badge_is_invalid_argument() {
    let (store, _clock) = make_store();
    assert!(matches!(
        store.award_badge("   "),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(store.get_state().user.badges().is_empty());
}

#[test]
fn streak_scenario() {
    let (store, _clock) = make_store();

    assert_eq!(store.update_streak(day(2026, 3, 1)).unwrap(), 1);
    assert_eq!(store.update_streak(day(2026, 3, 2)).unwrap(), 2);
    assert_eq!(store.update_streak(day(2026, 3, 2)).unwrap(), 2);
    assert_eq!(store.update_streak(day(2026, 3, 4)).unwrap(), 1);
}

#[test]
fn consecutive_days_grow_streak_by_one() {
    let (store, _clock) = make_store();
    for (i, date) in (10..=16).enumerate() {
        let streak = store.update_streak(day(2026, 5, date)).unwrap();
        assert_eq!(streak, i as u32 + 1);
    }
}

#[test]
fn out_of_order_streak_update_leaves_state_unchanged() {
    let (store, _clock) = make_store();
    store.update_streak(day(2026, 3, 1)).unwrap();
    store.update_streak(day(2026, 3, 2)).unwrap();
    let before = store.get_state();

    let err = store.update_streak(day(2026, 2, 28)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));

    let after = store.get_state();
    assert_eq!(after.user.streak(), 2);
    assert_eq!(after.user.last_active(), Some(day(2026, 3, 2)));
    assert_eq!(before, after);
}

#[test]
fn reset_clears_progress() {
    let (store, _clock) = make_store();
    store.add_xp(340).unwrap();
    store.award_badge("early-bird").unwrap();
    store.update_streak(day(2026, 1, 1)).unwrap();

    store.reset_progress().unwrap();

    let user = store.get_state().user;
    assert_eq!(user.xp(), 0);
    assert_eq!(user.level(), 1);
    assert_eq!(user.streak(), 0);
    assert!(user.badges().is_empty());
    assert_eq!(user.id, "user-1");
}

// -- record_scan ---------------------------------------------------------------

#[test]
fn record_scan_applies_all_rewards() {
    let (store, _clock) = make_store_with(sticky_settings());

    let result = store
        .record_scan(ScanOutcome::Malicious, day(2026, 4, 1))
        .unwrap();

    assert_eq!(result.xp_awarded, 25);
    assert_eq!(
        result.new_badges,
        vec![badges::FIRST_SCAN.to_string(), badges::THREAT_SPOTTER.to_string()]
    );
    assert_eq!(result.level_up, None);

    let state = store.get_state();
    assert_eq!(state.user.xp(), 25);
    assert_eq!(state.user.streak(), 1);
    let visible = state.notifications.visible.expect("scan message");
    assert_eq!(visible.id, result.notification_id);
    assert!(visible.text.contains("malicious"));
}

#[test]
fn repeated_scans_do_not_reaward_badges() {
    let (store, _clock) = make_store_with(sticky_settings());
    store.record_scan(ScanOutcome::Safe, day(2026, 4, 1)).unwrap();
    let second = store.record_scan(ScanOutcome::Safe, day(2026, 4, 1)).unwrap();

    assert!(second.new_badges.is_empty());
    assert_eq!(store.get_state().user.xp(), 20);
}

#[test]
fn streak_badge_unlocks_on_third_day() {
    let (store, _clock) = make_store_with(sticky_settings());
    store.record_scan(ScanOutcome::Safe, day(2026, 4, 1)).unwrap();
    store.record_scan(ScanOutcome::Safe, day(2026, 4, 2)).unwrap();
    let third = store.record_scan(ScanOutcome::Safe, day(2026, 4, 3)).unwrap();

    assert_eq!(third.new_badges, vec![badges::streak(3)]);
    assert!(store.get_state().user.has_badge(&badges::streak(3)));
}

#[test]
fn failed_scan_applies_nothing() {
    let (store, _clock) = make_store_with(sticky_settings());
    store.record_scan(ScanOutcome::Safe, day(2026, 4, 5)).unwrap();
    let before = store.get_state();
    let log = record_changes(&store);

    let err = store
        .record_scan(ScanOutcome::Malicious, day(2026, 4, 4))
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidState(_)));
    assert_eq!(store.get_state(), before);
    assert!(log.lock().is_empty());
}

#[test]
fn record_scan_crossing_level_reports_level_up() {
    let (store, _clock) = make_store_with(sticky_settings());
    store.add_xp(95).unwrap();
    let log = record_changes(&store);

    let result = store.record_scan(ScanOutcome::Safe, day(2026, 4, 1)).unwrap();

    assert_eq!(result.level_up, Some((1, 2)));
    let changes = log.lock();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].level_up(), Some((1, 2)));
}
