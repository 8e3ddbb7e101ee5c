//! Observer registry with RAII subscriptions.
//!
//! Callbacks are held weakly by the registry; the strong reference lives in
//! the returned [`Subscription`]. Dropping (or disposing) the subscription
//! unregisters the callback. Dead entries are pruned on the next notify.
//!
//! Callbacks run after the registry lock is released, so a callback may
//! read from, or subscribe to, the same registry.

use parking_lot::Mutex;
use std::any::Any;
use std::sync::{Arc, Weak};

pub type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;
type WeakObserver<S> = Weak<dyn Fn(&S) + Send + Sync>;

pub struct Observers<S> {
    subscribers: Mutex<Vec<WeakObserver<S>>>,
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<S: 'static> Observers<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Observer<S>) -> Subscription {
        self.subscribers.lock().push(Arc::downgrade(&observer));
        Subscription::holding(observer)
    }

    pub fn notify(&self, value: &S) {
        let live: Vec<Observer<S>> = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer(value);
        }
    }

    /// Number of subscribers whose guard is still alive.
    pub fn live_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.len()
    }
}

/// Guard keeping one or more callbacks registered.
#[must_use = "dropping a Subscription unregisters its callbacks"]
pub struct Subscription {
    guards: Vec<Box<dyn Any + Send + Sync>>,
}

impl Subscription {
    pub fn empty() -> Self {
        Self { guards: Vec::new() }
    }

    fn holding<S: 'static>(observer: Observer<S>) -> Self {
        Self {
            guards: vec![Box::new(observer)],
        }
    }

    /// Combine two subscriptions into one guard.
    pub fn join(mut self, mut other: Subscription) -> Self {
        self.guards.append(&mut other.guards);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn dispose(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("guards", &self.guards.len())
            .finish()
    }
}
