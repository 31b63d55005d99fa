//! Headless session driver.
//!
//! Replays a list of scan outcomes through a fresh store on a virtual
//! clock, the way the UI would drive it, and returns the final snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::companion::ManualScheduler;
use crate::error::StoreError;
use crate::navigation::Screen;
use crate::progression::{ScanOutcome, User};
use crate::store::{AppSnapshot, AppStore, StoreSettings};

/// Run one scan per entry in `scans`, all at `started_at`.
///
/// Between scans the virtual clock moves far enough for every pending
/// companion message to expire.
pub fn replay(
    user: User,
    settings: StoreSettings,
    scans: &[ScanOutcome],
    started_at: DateTime<Utc>,
) -> Result<AppSnapshot, StoreError> {
    let scheduler = ManualScheduler::new();
    let store = AppStore::new(user, settings, Arc::new(scheduler.clone()));
    let settle = Duration::from_millis(store.settings().companion.default_duration_ms.max(1));

    let subscription = store.subscribe(|change| {
        for signal in &change.signals {
            tracing::debug!(?signal, "Session signal");
        }
    });

    store.set_current_screen(Screen::Scan)?;
    for &outcome in scans {
        let result = store.record_scan(outcome, started_at)?;
        tracing::info!(
            %outcome,
            xp = result.xp_awarded,
            new_badges = ?result.new_badges,
            "Scan replayed"
        );
        // Drain the queue: each expiry promotes the next message
        while store.get_state().notifications.visible.is_some() {
            if scheduler.advance(settle) == 0 {
                break;
            }
        }
    }
    store.set_current_screen(Screen::Profile)?;

    let snapshot = store.get_state();
    subscription.unsubscribe();
    store.close();
    Ok(snapshot)
}
