//! Hot push/subscribe endpoints

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::observable::{Callback, Observable};
use crate::subscription::Subscription;

struct Observers<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

/// A stream endpoint that can be pushed to and subscribed to
///
/// Clones share the same observer list. Values pushed with
/// [`Subject::on_next`] are delivered synchronously to every subscriber
/// registered at the time of the push.
pub struct Subject<T> {
    observers: Arc<Observers<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            observers: Arc::clone(&self.observers),
        }
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.lock().len())
            .finish()
    }
}

impl<T> Subject<T> {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Callback<T>)>> {
        self.observers
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Whether both handles refer to the same endpoint
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.observers, &other.observers)
    }
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Create an endpoint with no subscribers
    pub fn new() -> Self {
        Self {
            observers: Arc::new(Observers {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Push a value to every current subscriber
    pub fn on_next(&self, value: T) {
        // Deliver outside the lock so callbacks may subscribe or dispose.
        let snapshot: Vec<Callback<T>> = self
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(value.clone());
        }
    }

    /// Subscribe a callback
    pub fn subscribe<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe_callback(Arc::new(on_next))
    }

    fn subscribe_callback(&self, callback: Callback<T>) -> Subscription {
        let id = self.observers.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, callback));

        let observers: Weak<Observers<T>> = Arc::downgrade(&self.observers);
        Subscription::new(move || {
            if let Some(observers) = observers.upgrade() {
                observers
                    .entries
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// View this endpoint as a plain observable
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |callback| subject.subscribe_callback(callback))
    }
}
