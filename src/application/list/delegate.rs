//! Forwarding base for store decorators.

use super::store::ListStore;
use crate::domain::{ListItem, ListState};
use crate::infra::observe::{Observer, Subscription};
use async_trait::async_trait;
use std::sync::Arc;

/// Forwards the whole [`ListStore`] contract to another store. Decorators
/// hold one and override only what they change.
pub struct ListStoreDelegate<T: ListItem> {
    delegate: Arc<dyn ListStore<T>>,
}

impl<T: ListItem> Clone for ListStoreDelegate<T> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
        }
    }
}

impl<T: ListItem> ListStoreDelegate<T> {
    pub fn new(delegate: Arc<dyn ListStore<T>>) -> Self {
        Self { delegate }
    }

    pub fn inner(&self) -> &Arc<dyn ListStore<T>> {
        &self.delegate
    }
}

#[async_trait]
impl<T: ListItem> ListStore<T> for ListStoreDelegate<T> {
    fn state(&self) -> Arc<ListState<T>> {
        self.delegate.state()
    }

    fn subscribe(&self, observer: Observer<ListState<T>>) -> Subscription {
        self.delegate.subscribe(observer)
    }

    async fn load(&self) {
        self.delegate.load().await
    }

    async fn load_more(&self) {
        self.delegate.load_more().await
    }

    async fn refresh(&self) {
        self.delegate.refresh().await
    }

    fn mutate_items(&self, items: Vec<T>) {
        self.delegate.mutate_items(items)
    }

    fn mutate_item(&self, index: usize, item: T) {
        self.delegate.mutate_item(index, item)
    }

    fn remove_item(&self, index: usize) {
        self.delegate.remove_item(index)
    }

    fn clear(&self) {
        self.delegate.clear()
    }

    fn patch_items(&self, patch: &dyn Fn(&T) -> Option<T>) -> usize {
        self.delegate.patch_items(patch)
    }
}
