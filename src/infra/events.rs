//! Cross-list publish/subscribe channel.
//!
//! One list announces an item-level change and every list holding that item
//! patches its own copy. The bus is passed to stores explicitly; there is no
//! process-wide instance.

use crate::infra::observe::{Observers, Subscription};
use log::debug;
use std::sync::Arc;

pub struct EventBus<E> {
    listeners: Observers<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            listeners: Observers::default(),
        }
    }
}

impl<E: std::fmt::Debug + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: E) {
        debug!(target: "events", "publish {:?}", event);
        self.listeners.notify(&event);
    }

    pub fn on(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(Arc::new(listener))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.live_count()
    }
}
