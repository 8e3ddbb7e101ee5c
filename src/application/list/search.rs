//! Content/search switching over two list stores.

use super::fetcher::QueryListFetcher;
use super::store::{BaseListStore, ListStore, LoadOptions, StoreContext, StoreOptions};
use crate::domain::{ListItem, ListState};
use crate::infra::observe::{Observer, Observers, Subscription};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Serves either unfiltered content or results for a live query.
///
/// Both sub-stores are built from the same fetcher factory. Only the search
/// store's fetcher carries a query; the content store keeps its cache while
/// search mode is on, so leaving search mode restores it without a fetch.
pub struct SearchListStore<T: ListItem> {
    query_fetcher: Arc<dyn QueryListFetcher<T>>,
    content_store: Arc<BaseListStore<T>>,
    search_store: Arc<BaseListStore<T>>,
    search_mode: Arc<AtomicBool>,
    mode_observers: Observers<ListState<T>>,
}

impl<T: ListItem> SearchListStore<T> {
    pub fn new<F, P>(fetcher_provider: P, context: StoreContext) -> Self
    where
        F: QueryListFetcher<T> + 'static,
        P: Fn() -> F,
    {
        let query_fetcher = Arc::new(fetcher_provider());
        let content_store = BaseListStore::with_options(
            fetcher_provider(),
            StoreOptions::default(),
            context.clone(),
        );
        // Superseded queries resolve to stale, so overlapping searches are safe.
        let search_store =
            BaseListStore::with_options(query_fetcher.clone(), StoreOptions::parallel(), context);
        Self {
            query_fetcher,
            content_store: Arc::new(content_store),
            search_store: Arc::new(search_store),
            search_mode: Arc::new(AtomicBool::new(false)),
            mode_observers: Observers::new(),
        }
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode.load(Ordering::SeqCst)
    }

    pub fn query(&self) -> Option<String> {
        self.query_fetcher.query()
    }

    pub fn content_store(&self) -> &Arc<BaseListStore<T>> {
        &self.content_store
    }

    pub fn search_store(&self) -> &Arc<BaseListStore<T>> {
        &self.search_store
    }

    pub fn current_store(&self) -> &Arc<BaseListStore<T>> {
        if self.is_search_mode() {
            &self.search_store
        } else {
            &self.content_store
        }
    }

    /// Entering search mode drops leftovers of the previous search; leaving
    /// it unbinds the query. The content store is never touched.
    pub fn set_search_mode(&self, mode: bool) {
        if self.is_search_mode() == mode {
            return;
        }
        debug!(target: "search", "set search mode {}", mode);
        self.query_fetcher.set_query(None);
        if mode {
            self.search_store.clear();
        }
        self.search_mode.store(mode, Ordering::SeqCst);
        self.mode_observers.notify(&self.current_store().state());
    }

    /// Bind `query` and load its first page into the search store.
    ///
    /// No-op outside search mode or when the trimmed query is already bound.
    /// An empty query unbinds and clears the search results.
    pub async fn search(&self, query: &str) {
        if !self.is_search_mode() {
            return;
        }
        let trimmed = query.trim();
        let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
        if self.query_fetcher.query() == next {
            return;
        }
        debug!(target: "search", "search {:?}", next);
        let Some(next) = next else {
            self.query_fetcher.set_query(None);
            self.search_store.clear();
            return;
        };
        self.query_fetcher.set_query(Some(next));
        self.search_store.load_with(LoadOptions::default()).await;
    }
}

#[async_trait]
impl<T: ListItem> ListStore<T> for SearchListStore<T> {
    fn state(&self) -> Arc<ListState<T>> {
        self.current_store().state()
    }

    fn subscribe(&self, observer: Observer<ListState<T>>) -> Subscription {
        let content = {
            let mode = self.search_mode.clone();
            let observer = observer.clone();
            self.content_store
                .subscribe(Arc::new(move |state: &ListState<T>| {
                    if !mode.load(Ordering::SeqCst) {
                        observer(state);
                    }
                }))
        };
        let search = {
            let mode = self.search_mode.clone();
            let observer = observer.clone();
            self.search_store
                .subscribe(Arc::new(move |state: &ListState<T>| {
                    if mode.load(Ordering::SeqCst) {
                        observer(state);
                    }
                }))
        };
        content
            .join(search)
            .join(self.mode_observers.subscribe(observer))
    }

    async fn load(&self) {
        self.current_store().load_with(LoadOptions::quiet()).await
    }

    async fn load_more(&self) {
        self.current_store().load_more().await
    }

    async fn refresh(&self) {
        self.current_store().refresh().await
    }

    fn mutate_items(&self, items: Vec<T>) {
        self.current_store().mutate_items(items)
    }

    fn mutate_item(&self, index: usize, item: T) {
        self.current_store().mutate_item(index, item)
    }

    fn remove_item(&self, index: usize) {
        self.current_store().remove_item(index)
    }

    fn clear(&self) {
        debug!(target: "search", "clear");
        self.query_fetcher.set_query(None);
        self.content_store.clear();
        self.search_store.clear();
    }

    /// Patches the cached content as well, so leaving search mode never
    /// shows an outdated copy.
    fn patch_items(&self, patch: &dyn Fn(&T) -> Option<T>) -> usize {
        self.content_store.patch_items(patch) + self.search_store.patch_items(patch)
    }
}
