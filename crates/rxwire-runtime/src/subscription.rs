//! Subscription handles

use std::sync::{Arc, Mutex};

type DisposeFn = Box<dyn FnOnce() + Send>;

/// Handle to an active subscription
///
/// Disposing runs the teardown exactly once, however many times it is
/// requested. Dropping the handle disposes it unless [`Subscription::forget`]
/// was called.
pub struct Subscription {
    teardown: Disposer,
    armed: bool,
}

impl Subscription {
    /// Create a subscription that runs `teardown` when disposed
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Disposer(Arc::new(Mutex::new(Some(Box::new(teardown))))),
            armed: true,
        }
    }

    /// A subscription with nothing to tear down
    pub fn empty() -> Self {
        Self {
            teardown: Disposer(Arc::new(Mutex::new(None))),
            armed: true,
        }
    }

    /// Run the teardown if it has not run yet
    pub fn dispose(&self) {
        self.teardown.dispose();
    }

    /// Whether the teardown has already run (or there was none)
    pub fn is_disposed(&self) -> bool {
        self.teardown.is_disposed()
    }

    /// Keep the subscription alive for as long as its source lives
    pub fn forget(mut self) {
        self.armed = false;
    }

    /// A shareable handle that can dispose this subscription later
    pub(crate) fn disposer(&self) -> Disposer {
        self.teardown.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.armed {
            self.dispose();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Shared teardown slot
#[derive(Clone)]
pub(crate) struct Disposer(Arc<Mutex<Option<DisposeFn>>>);

impl Disposer {
    pub(crate) fn dispose(&self) {
        let teardown = self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        // Run outside the lock; teardown may re-enter the source.
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    fn is_disposed(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}
