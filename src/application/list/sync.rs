//! Keeps independent lists consistent through the event bus.

use super::store::ListStore;
use crate::domain::{EventPatch, ListItem};
use crate::infra::events::EventBus;
use crate::infra::observe::Subscription;
use log::debug;
use std::sync::{Arc, Weak};

/// Patch every item of `store` that an event on `bus` concerns.
///
/// The store is held weakly; once it is dropped the listener does nothing.
pub fn bind_to_events<T, E>(bus: &EventBus<E>, store: &Arc<dyn ListStore<T>>) -> Subscription
where
    T: ListItem + EventPatch<E>,
    E: std::fmt::Debug + 'static,
{
    let store: Weak<dyn ListStore<T>> = Arc::downgrade(store);
    bus.on(move |event: &E| {
        let Some(store) = store.upgrade() else {
            return;
        };
        apply_event(store.as_ref(), event);
    })
}

/// Patch the matching items of one store in place. Returns how many changed.
pub fn apply_event<T, E>(store: &dyn ListStore<T>, event: &E) -> usize
where
    T: ListItem + EventPatch<E>,
{
    let patched = store.patch_items(&|item: &T| item.patched(event));
    if patched > 0 {
        debug!(target: "events", "patched {} item(s)", patched);
    }
    patched
}
