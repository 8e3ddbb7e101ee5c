//! Shared application state: configuration, the cross-list event bus and
//! the feedback channels every store is built with.

use crate::application::list::{
    BaseListStore, ExploreStore, ListStore, QueryListFetcher, SearchListStore, StoreContext,
    StoreOptions, bind_to_events, create_list_store,
};
use crate::domain::{ApiReply, AppEvent, EventPatch, ListItem, Page, StoreError};
use crate::infra::app_config::{ListSyncConfig, load_config};
use crate::infra::events::EventBus;
use crate::infra::observe::Subscription;
use crate::infra::retry::RetryPolicy;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<RwLock<ListSyncConfig>>,
    pub events: Arc<EventBus<AppEvent>>,
    pub context: StoreContext,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(load_config())
    }

    pub fn with_config(config: ListSyncConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            events: Arc::new(EventBus::new()),
            context: StoreContext::default(),
        }
    }

    pub fn with_context(mut self, context: StoreContext) -> Self {
        self.context = context;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.read().retry
    }

    pub fn page_size(&self) -> u32 {
        self.config.read().page_size
    }

    /// Plain paginated store wired to this state's feedback channels.
    pub fn list_store<T, L, LFut, M, MFut>(&self, load: L, load_more: M) -> Arc<BaseListStore<T>>
    where
        T: ListItem,
        L: Fn(Option<String>) -> LFut + Send + Sync + 'static,
        LFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
        M: Fn(String, Option<String>) -> MFut + Send + Sync + 'static,
        MFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
    {
        Arc::new(create_list_store(
            load,
            load_more,
            StoreOptions::default(),
            self.context.clone(),
        ))
    }

    pub fn search_store<T, F, P>(&self, fetcher_provider: P) -> Arc<SearchListStore<T>>
    where
        T: ListItem,
        F: QueryListFetcher<T> + 'static,
        P: Fn() -> F,
    {
        Arc::new(SearchListStore::new(fetcher_provider, self.context.clone()))
    }

    /// Progressive reveal over `delegate` using the configured counts.
    pub fn explore_store<T: ListItem>(
        &self,
        delegate: Arc<dyn ListStore<T>>,
    ) -> Result<ExploreStore<T>, StoreError> {
        let explore = self.config.read().explore.clone();
        ExploreStore::from_config(delegate, &explore)
    }

    /// Keep `store` in sync with item events published on this state's bus.
    pub fn bind_events<T>(&self, store: &Arc<dyn ListStore<T>>) -> Subscription
    where
        T: ListItem + EventPatch<AppEvent>,
    {
        bind_to_events(&self.events, store)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
