//! Lazily connected signal endpoints
//!
//! A [`BoundSignal`] starts out unconnected. The first call to
//! [`BoundSignal::get_or_connect`] creates a [`Subject`], registers one
//! permanent bridge subscription on it, and caches it; every later call
//! returns the cached subject and ignores the bridge it was given. There is
//! no transition back.
//!
//! The transition goes through [`OnceLock`], so concurrent first accesses
//! still register exactly one bridge.

use std::sync::OnceLock;

use crate::subject::Subject;
use crate::subscription::Subscription;

/// Per-event endpoint behind a generated bidirectional property
pub struct BoundSignal<T> {
    endpoint: OnceLock<(Subject<T>, Subscription)>,
}

impl<T> BoundSignal<T> {
    /// An unconnected signal
    pub const fn new() -> Self {
        Self {
            endpoint: OnceLock::new(),
        }
    }

    /// Whether the endpoint has been created
    pub fn is_connected(&self) -> bool {
        self.endpoint.get().is_some()
    }
}

impl<T> Default for BoundSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BoundSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundSignal")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<T: Clone + Send + 'static> BoundSignal<T> {
    /// Return the endpoint, connecting it through `bridge` on first access
    pub fn get_or_connect<F>(&self, bridge: F) -> Subject<T>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let (subject, _bridge) = self.endpoint.get_or_init(|| {
            let subject = Subject::new();
            let bridge = subject.subscribe(bridge);
            tracing::trace!("bound signal connected");
            (subject, bridge)
        });
        subject.clone()
    }

    /// The endpoint, if connected
    pub fn endpoint(&self) -> Option<Subject<T>> {
        self.endpoint.get().map(|(subject, _)| subject.clone())
    }
}
