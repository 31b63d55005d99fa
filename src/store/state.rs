//! Application store.
//!
//! Owns the user, navigation and companion models plus the pending
//! dismissal timer. Mutations are validated and applied to a draft copy;
//! only a fully successful draft is committed, so a rejected operation
//! leaves every sub-model untouched.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::companion::{
    CompanionIntent, CompanionReducer, CompanionState, DismissScheduler, Notification, TimerHandle,
};
use crate::config::{CompanionConfig, Config, NavigationConfig, RewardsConfig};
use crate::error::StoreError;
use crate::mvi::Reducer;
use crate::navigation::{NavigationIntent, NavigationReducer, NavigationState, Screen, ScreenTransition};
use crate::progression::{ProgressionIntent, ProgressionReducer, ScanOutcome, User};

use super::events::{AppSnapshot, DismissReason, NotificationsSnapshot, ScanResult, Signal, StateChange};
use super::listeners::{ListenerRegistry, Subscription};

/// Store tuning taken from the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSettings {
    pub rewards: RewardsConfig,
    pub companion: CompanionConfig,
    pub navigation: NavigationConfig,
}

impl From<&Config> for StoreSettings {
    fn from(config: &Config) -> Self {
        Self {
            rewards: config.rewards.clone(),
            companion: config.companion.clone(),
            navigation: config.navigation.clone(),
        }
    }
}

impl StoreSettings {
    fn message_duration(&self) -> Option<Duration> {
        match self.companion.default_duration_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

/// Session-scoped state container.
///
/// Cheap to clone; clones share the same state. Independent sessions
/// construct independent stores.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<StoreState>,
    listeners: Arc<ListenerRegistry>,
    scheduler: Arc<dyn DismissScheduler>,
    settings: StoreSettings,
}

struct StoreState {
    user: User,
    navigation: NavigationState,
    companion: CompanionState,
    next_notification_id: u64,
    dismiss_timer: Option<(u64, TimerHandle)>,
    closed: bool,
}

/// Working copy a mutation is applied to before commit.
struct Draft<'a> {
    user: User,
    navigation: NavigationState,
    companion: CompanionState,
    next_notification_id: u64,
    signals: Vec<Signal>,
    settings: &'a StoreSettings,
}

impl<'a> Draft<'a> {
    fn new(state: &StoreState, settings: &'a StoreSettings) -> Self {
        Self {
            user: state.user.clone(),
            navigation: state.navigation.clone(),
            companion: state.companion.clone(),
            next_notification_id: state.next_notification_id,
            signals: Vec::new(),
            settings,
        }
    }

    fn differs_from(&self, state: &StoreState) -> bool {
        self.user != state.user
            || self.navigation != state.navigation
            || self.companion != state.companion
    }

    fn add_xp(&mut self, amount: u32) -> Result<Option<(u64, u64)>, StoreError> {
        let from = self.user.level();
        self.user = ProgressionReducer::reduce(&self.user, ProgressionIntent::AddXp { amount })?;
        let to = self.user.level();
        if to <= from {
            return Ok(None);
        }
        tracing::info!(from, to, "Level up");
        self.signals.push(Signal::LevelUp { from, to });
        let duration = self.settings.message_duration();
        self.enqueue(format!("Level up! You reached level {}.", to), duration);
        Ok(Some((from, to)))
    }

    /// Returns true if the badge was not held before.
    fn award_badge(&mut self, badge: String) -> Result<bool, StoreError> {
        let held = self.user.has_badge(badge.trim());
        self.user = ProgressionReducer::reduce(&self.user, ProgressionIntent::AwardBadge { badge: badge.clone() })?;
        if held {
            return Ok(false);
        }
        self.signals.push(Signal::BadgeUnlocked {
            badge: badge.trim().to_string(),
        });
        Ok(true)
    }

    fn update_streak(&mut self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.user = ProgressionReducer::reduce(&self.user, ProgressionIntent::UpdateStreak { at })?;
        Ok(())
    }

    fn navigate(&mut self, target: Screen) -> Result<(), StoreError> {
        let from = self.navigation.current();
        self.navigation = NavigationReducer::reduce(
            &self.navigation,
            NavigationIntent::Navigate {
                target,
                at: Utc::now(),
            },
        )?;
        self.signals.push(Signal::ScreenChanged { from, to: target });
        Ok(())
    }

    fn enqueue(&mut self, text: String, duration: Option<Duration>) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.dispatch_companion(
            CompanionIntent::Enqueue {
                notification: Notification {
                    id,
                    text,
                    created_at: Utc::now(),
                    duration,
                },
            },
            DismissReason::Manual,
        );
        id
    }

    /// Run the companion reducer and record shown/dismissed signals.
    /// Returns the notification that left the visible slot, if any.
    fn dispatch_companion(&mut self, intent: CompanionIntent, reason: DismissReason) -> Option<Notification> {
        let before = self.companion.visible().cloned();
        self.companion = match CompanionReducer::reduce(&self.companion, intent) {
            Ok(next) => next,
            Err(never) => match never {},
        };
        let after = self.companion.visible().map(|n| n.id);
        if before.as_ref().map(|n| n.id) == after {
            return None;
        }
        if let Some(dismissed) = &before {
            self.signals.push(Signal::NotificationDismissed {
                id: dismissed.id,
                reason,
            });
        }
        if let Some(id) = after {
            self.signals.push(Signal::NotificationShown { id });
        }
        before
    }
}

impl AppStore {
    /// Start a session for `user` on the home screen.
    pub fn new(user: User, settings: StoreSettings, scheduler: Arc<dyn DismissScheduler>) -> Self {
        let navigation = NavigationState::with_history_limit(settings.navigation.history_limit);
        tracing::debug!(user_id = %user.id, "Store created");
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(StoreState {
                    user,
                    navigation,
                    companion: CompanionState::default(),
                    next_notification_id: 1,
                    dismiss_timer: None,
                    closed: false,
                }),
                listeners: Arc::new(ListenerRegistry::default()),
                scheduler,
                settings,
            }),
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.inner.settings
    }

    // -- Read / subscribe ------------------------------------------------------

    pub fn get_state(&self) -> AppSnapshot {
        snapshot(&self.inner.state.lock())
    }

    /// Recent screen transitions, oldest first.
    pub fn transition_log(&self) -> Vec<ScreenTransition> {
        self.inner
            .state
            .lock()
            .navigation
            .transitions()
            .cloned()
            .collect()
    }

    /// Register a listener called after every state change, in
    /// registration order.
    pub fn subscribe(&self, listener: impl Fn(&StateChange) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.listeners.add(Arc::new(listener));
        Subscription::new(id, &self.inner.listeners)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    // -- Progression -----------------------------------------------------------

    /// Add XP. Returns `(from, to)` levels when the user levelled up.
    pub fn add_xp(&self, amount: u32) -> Result<Option<(u64, u64)>, StoreError> {
        self.mutate(|draft| draft.add_xp(amount))
    }

    /// Award a badge. Returns false if it was already held.
    pub fn award_badge(&self, badge: impl Into<String>) -> Result<bool, StoreError> {
        let badge = badge.into();
        self.mutate(|draft| draft.award_badge(badge))
    }

    pub fn update_streak(&self, at: DateTime<Utc>) -> Result<u32, StoreError> {
        self.mutate(|draft| {
            draft.update_streak(at)?;
            Ok(draft.user.streak())
        })
    }

    pub fn reset_progress(&self) -> Result<(), StoreError> {
        self.mutate(|draft| {
            draft.user = ProgressionReducer::reduce(&draft.user, ProgressionIntent::Reset)?;
            Ok(())
        })
    }

    /// Apply the rewards for one scan: streak, XP, badges and a companion
    /// message. Nothing is applied if any step fails.
    pub fn record_scan(&self, outcome: ScanOutcome, at: DateTime<Utc>) -> Result<ScanResult, StoreError> {
        self.mutate(|draft| {
            draft.update_streak(at)?;
            let xp_awarded = draft.settings.rewards.xp_for(outcome);
            let level_up = draft.add_xp(xp_awarded)?;

            let mut new_badges = Vec::new();
            for badge in draft.settings.rewards.earned_badges(&draft.user, outcome) {
                if draft.award_badge(badge.clone())? {
                    new_badges.push(badge);
                }
            }

            let mut text = outcome.companion_text().to_string();
            if !new_badges.is_empty() {
                text.push_str(&format!(" New badge: {}.", new_badges.join(", ")));
            }
            let duration = draft.settings.message_duration();
            let notification_id = draft.enqueue(text, duration);

            tracing::debug!(%outcome, xp_awarded, badges = new_badges.len(), "Scan recorded");
            Ok(ScanResult {
                outcome,
                xp_awarded,
                new_badges,
                level_up,
                notification_id,
            })
        })
    }

    // -- Navigation ------------------------------------------------------------

    pub fn set_current_screen(&self, target: Screen) -> Result<(), StoreError> {
        self.mutate(|draft| {
            let from = draft.navigation.current();
            draft.navigate(target)?;
            tracing::info!(%from, to = %target, "Screen transition");
            Ok(())
        })
    }

    /// Navigate by screen id, e.g. `"scan"`. Unknown ids are rejected.
    pub fn navigate_to(&self, screen_id: &str) -> Result<(), StoreError> {
        let target: Screen = screen_id.parse()?;
        self.set_current_screen(target)
    }

    // -- Companion -------------------------------------------------------------

    /// Queue a companion message. Returns its id.
    ///
    /// `duration` arms an auto-dismiss timer once the message is visible;
    /// `None` keeps it until dismissed by hand.
    pub fn show_message(&self, text: impl Into<String>, duration: Option<Duration>) -> Result<u64, StoreError> {
        let text = text.into();
        self.mutate(|draft| Ok(draft.enqueue(text, duration)))
    }

    /// Remove the visible message and promote the next one.
    /// Returns the dismissed message, or `None` if nothing was visible.
    pub fn dismiss_current(&self) -> Result<Option<Notification>, StoreError> {
        self.mutate(|draft| Ok(draft.dispatch_companion(CompanionIntent::DismissCurrent, DismissReason::Manual)))
    }

    fn expire(&self, id: u64) -> Result<Option<Notification>, StoreError> {
        self.mutate(|draft| Ok(draft.dispatch_companion(CompanionIntent::Expire { id }, DismissReason::Expired)))
    }

    // -- Lifecycle -------------------------------------------------------------

    /// End the session: cancel the pending timer and drop all listeners.
    /// Later mutations fail with `InvalidState`.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        if let Some((_, timer)) = state.dismiss_timer.take() {
            timer.cancel();
        }
        self.inner.listeners.clear();
        tracing::debug!(user_id = %state.user.id, "Store closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    // -- Internals -------------------------------------------------------------

    /// Apply `op` to a draft, commit it, then notify subscribers.
    ///
    /// Listeners run after the state lock is released. A mutation made
    /// from inside a listener is queued and delivered once the current
    /// change has reached every listener, so all listeners see changes in
    /// commit order.
    fn mutate<R>(&self, op: impl FnOnce(&mut Draft<'_>) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let result = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(StoreError::invalid_state("store is closed"));
            }

            let mut draft = Draft::new(&state, &self.inner.settings);
            let result = op(&mut draft)?;

            let changed = draft.differs_from(&state) || !draft.signals.is_empty();
            let Draft {
                user,
                navigation,
                companion,
                next_notification_id,
                signals,
                ..
            } = draft;
            state.user = user;
            state.navigation = navigation;
            state.companion = companion;
            state.next_notification_id = next_notification_id;
            self.sync_dismiss_timer(&mut state);

            if changed {
                self.inner.listeners.enqueue(StateChange {
                    snapshot: snapshot(&state),
                    signals,
                });
            }
            result
        };

        self.inner.listeners.flush();
        Ok(result)
    }

    /// Keep exactly one timer armed, for the visible notification.
    fn sync_dismiss_timer(&self, state: &mut StoreState) {
        let visible = state.companion.visible().map(|n| (n.id, n.duration));
        let armed_for = state.dismiss_timer.as_ref().map(|(id, _)| *id);
        if visible.map(|(id, _)| id) == armed_for {
            return;
        }

        if let Some((_, timer)) = state.dismiss_timer.take() {
            timer.cancel();
        }

        if let Some((id, Some(delay))) = visible {
            let store: Weak<StoreInner> = Arc::downgrade(&self.inner);
            let handle = self.inner.scheduler.schedule(
                delay,
                Box::new(move || {
                    if let Some(inner) = store.upgrade() {
                        // Closed store: nothing left to dismiss
                        let _ = AppStore { inner }.expire(id);
                    }
                }),
            );
            state.dismiss_timer = Some((id, handle));
        }
    }
}

fn snapshot(state: &StoreState) -> AppSnapshot {
    AppSnapshot {
        user: state.user.clone(),
        current_screen: state.navigation.current(),
        notifications: NotificationsSnapshot {
            visible: state.companion.visible().cloned(),
            queued: state.companion.queued().cloned().collect(),
        },
    }
}
