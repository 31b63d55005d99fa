//! Ordered observer registry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::events::StateChange;

pub type Listener = Arc<dyn Fn(&StateChange) + Send + Sync>;

#[derive(Default)]
pub(super) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
    outbox: Mutex<Outbox>,
}

/// Committed changes waiting for delivery.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<StateChange>,
    delivering: bool,
}

/// Releases the delivery flag if a listener panics mid-delivery.
struct DeliveryGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.lock().delivering = false;
        }
    }
}

impl ListenerRegistry {
    pub(super) fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push((id, listener));
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(super) fn clear(&self) {
        self.listeners.lock().clear();
        self.outbox.lock().pending.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Queue a committed change. Must be called under the state lock so
    /// the queue follows commit order.
    pub(super) fn enqueue(&self, change: StateChange) {
        self.outbox.lock().pending.push_back(change);
    }

    /// Deliver queued changes in commit order, each to every listener.
    ///
    /// A call made while a delivery is already running (a listener that
    /// mutates the store) returns at once; the running loop picks up the
    /// new change after the current one has reached every listener.
    pub(super) fn flush(&self) {
        {
            let mut outbox = self.outbox.lock();
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }
        let _guard = DeliveryGuard(&self.outbox);

        loop {
            let change = {
                let mut outbox = self.outbox.lock();
                match outbox.pending.pop_front() {
                    Some(change) => change,
                    None => {
                        outbox.delivering = false;
                        return;
                    }
                }
            };
            self.notify(&change);
        }
    }

    /// Call every listener in registration order.
    ///
    /// The list is copied first so listeners may subscribe, unsubscribe or
    /// mutate the store while being notified.
    fn notify(&self, change: &StateChange) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

/// Handle returned by `AppStore::subscribe`.
///
/// Dropping the handle keeps the listener registered; call `unsubscribe`
/// to remove it.
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(super) fn new(id: u64, registry: &Arc<ListenerRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Remove the listener. Returns false if it was already gone
    /// (store closed or dropped).
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}
