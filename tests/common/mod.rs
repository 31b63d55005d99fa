//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use cyberqr::companion::ManualScheduler;
use cyberqr::progression::User;
use cyberqr::store::{AppStore, Signal, StateChange, StoreSettings};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Every change delivered to a recording subscriber.
pub type ChangeLog = Arc<Mutex<Vec<StateChange>>>;

// -- Store helpers ------------------------------------------------------------

pub fn test_user() -> User {
    User::new("user-1", "player@example.com", "Player One")
}

/// Store with default settings on a virtual clock.
pub fn make_store() -> (AppStore, ManualScheduler) {
    make_store_with(StoreSettings::default())
}

pub fn make_store_with(settings: StoreSettings) -> (AppStore, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let store = AppStore::new(test_user(), settings, Arc::new(scheduler.clone()));
    (store, scheduler)
}

/// Settings whose scan messages never auto-dismiss.
pub fn sticky_settings() -> StoreSettings {
    let mut settings = StoreSettings::default();
    settings.companion.default_duration_ms = 0;
    settings
}

/// Subscribe a listener that records every change.
pub fn record_changes(store: &AppStore) -> ChangeLog {
    let log: ChangeLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    // Handle dropped on purpose: the listener stays registered.
    let _ = store.subscribe(move |change| sink.lock().push(change.clone()));
    log
}

pub fn count_signals(log: &ChangeLog, predicate: impl Fn(&Signal) -> bool) -> usize {
    log.lock()
        .iter()
        .flat_map(|change| change.signals.iter())
        .filter(|signal| predicate(signal))
        .count()
}

/// Noon UTC on the given date.
pub fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, date, 12, 0, 0).unwrap()
}

// -- Config helpers -----------------------------------------------------------

/// Write `content` to a temporary `config.toml`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

// -- Server helpers -----------------------------------------------------------

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
