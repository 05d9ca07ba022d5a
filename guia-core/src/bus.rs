//! Observer registration and synchronous fan-out
//!
//! Both the position side and the speech side publish their state
//! transitions through a `NotificationBus`. Observers are plain closures;
//! registration hands back a disposer rather than relying on identity
//! based removal.

use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::warn;

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct BusInner<T> {
    observers: RwLock<Vec<(u64, Observer<T>)>>,
    next_id: AtomicU64,
}

/// Fan-out point for one category of events.
///
/// Notification is synchronous and in subscription order. Delivery
/// iterates over a snapshot of the subscriber list, so an observer may
/// subscribe or unsubscribe from within its own callback without
/// corrupting the iteration.
pub struct NotificationBus<T> {
    inner: Arc<BusInner<T>>,
}

impl<T> Clone for NotificationBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for NotificationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

// 'static because a subscription's disposer keeps a `Weak` back to the
// observer list beyond any borrow of the payload type.
impl<T: 'static> NotificationBus<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                observers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register an observer. The returned `Subscription` is the only way
    /// to remove it again; re-subscribing the same closure after
    /// unsubscribing creates an independent registration.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.write().push((id, Arc::new(observer)));

        let weak = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Mutex::new(Some(Box::new(move || {
                Self::remove(&weak, id);
            }))),
        }
    }

    fn remove(inner: &Weak<BusInner<T>>, id: u64) {
        if let Some(inner) = inner.upgrade() {
            inner.observers.write().retain(|(oid, _)| *oid != id);
        }
    }

    /// Deliver one payload to every currently subscribed observer.
    ///
    /// A panicking observer is caught and logged; the remaining observers
    /// still receive the payload and the bus state stays intact.
    pub fn notify(&self, payload: &T) {
        let snapshot: Vec<Observer<T>> = self
            .inner
            .observers
            .read()
            .iter()
            .map(|(_, obs)| Arc::clone(obs))
            .collect();

        for observer in snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer(payload))).is_err() {
                warn!("observer panicked during notification, continuing with remaining observers");
            }
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }
}

/// Disposer handle for one observer registration.
///
/// `unsubscribe` is idempotent; calling it twice, or after the bus itself
/// is gone, is a no-op.
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(cancel) = self.cancel.lock().take() {
            cancel();
        }
    }
}
