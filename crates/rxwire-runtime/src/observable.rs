//! Cold observables
//!
//! An [`Observable`] does nothing until subscribed. Each subscription runs the
//! subscribe function again, which is what lets event adapters attach a fresh
//! native handler per subscriber and detach it on disposal.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::Unit;
use crate::subscription::Subscription;

/// The callback a stream hands to its source
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Native handler type for events without parameters
pub type UnitHandler = Arc<dyn Fn() + Send + Sync>;

type SubscribeFn<T> = dyn Fn(Callback<T>) -> Subscription + Send + Sync;

/// A cold, subscribe-driven stream of values
pub struct Observable<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Create an observable from a subscribe function
    pub fn new<F>(subscribe: F) -> Self
    where
        F: Fn(Callback<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            subscribe_fn: Arc::new(subscribe),
        }
    }

    /// Subscribe to the stream
    pub fn subscribe<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        (self.subscribe_fn)(Arc::new(on_next))
    }

    /// Adapt an add/remove accessor pair into a stream
    ///
    /// For every subscription, `conversion` turns the stream callback into a
    /// native handler, `add` attaches it, and disposal passes the same handler
    /// to `remove`. A cancelled `cancellation_token` suppresses new
    /// subscriptions and stops delivery; inside a tokio runtime it also
    /// detaches the handler as soon as the token fires.
    pub fn from_event<H, C, A, R>(
        conversion: C,
        add: A,
        remove: R,
        cancellation_token: CancellationToken,
    ) -> Self
    where
        H: Clone + Send + 'static,
        C: Fn(Callback<T>) -> H + Send + Sync + 'static,
        A: Fn(H) + Send + Sync + 'static,
        R: Fn(H) + Send + Sync + 'static,
    {
        let remove = Arc::new(remove);

        Self::new(move |on_next: Callback<T>| {
            if cancellation_token.is_cancelled() {
                return Subscription::empty();
            }

            let gate = cancellation_token.clone();
            let guarded: Callback<T> = Arc::new(move |value| {
                if !gate.is_cancelled() {
                    on_next(value);
                }
            });

            let handler = conversion(guarded);
            add(handler.clone());

            let done = CancellationToken::new();
            let subscription = Subscription::new({
                let remove = Arc::clone(&remove);
                let done = done.clone();
                move || {
                    remove(handler);
                    done.cancel();
                }
            });

            watch_cancellation(&cancellation_token, done, &subscription);
            subscription
        })
    }
}

impl Observable<Unit> {
    /// Adapt an accessor pair whose handler takes no arguments
    pub fn from_unit_event<A, R>(add: A, remove: R, cancellation_token: CancellationToken) -> Self
    where
        A: Fn(UnitHandler) + Send + Sync + 'static,
        R: Fn(UnitHandler) + Send + Sync + 'static,
    {
        Self::from_event(
            |on_next: Callback<Unit>| -> UnitHandler { Arc::new(move || on_next(Unit)) },
            add,
            remove,
            cancellation_token,
        )
    }
}

/// Dispose `subscription` when `token` fires, if a tokio runtime is available
fn watch_cancellation(token: &CancellationToken, done: CancellationToken, subscription: &Subscription) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        return;
    };

    let token = token.clone();
    let disposer = subscription.disposer();
    runtime.spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::trace!("event subscription cancelled");
                disposer.dispose();
            }
            _ = done.cancelled() => {}
        }
    });
}
