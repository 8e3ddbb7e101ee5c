//! Progressive reveal of a list.
//!
//! An [`ExploreStore`] shows a growing prefix of its delegate's list. Asking
//! for more first reveals items that are already fetched and only goes to the
//! network once the requested prefix is longer than the fetched list.

use super::delegate::ListStoreDelegate;
use super::store::ListStore;
use crate::domain::{ListItem, ListState, StoreError};
use crate::infra::app_config::ExploreConfig;
use crate::infra::observe::{Observer, Observers, Subscription};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ExploreState<T> {
    pub explored_list: Arc<Vec<T>>,
    pub requested_count: usize,
    pub explored_count: usize,
}

impl<T> ExploreState<T> {
    fn initial(requested_count: usize) -> Self {
        Self {
            explored_list: Arc::new(Vec::new()),
            requested_count,
            explored_count: 0,
        }
    }
}

struct Progress<T> {
    state: Arc<ExploreState<T>>,
    /// Delegate list the current prefix was cut from.
    source: Arc<Vec<T>>,
}

type SharedProgress<T> = Arc<Mutex<Progress<T>>>;

pub struct ExploreStore<T: ListItem> {
    base: ListStoreDelegate<T>,
    initial_count: usize,
    explore_limit: usize,
    progress: SharedProgress<T>,
    observers: Arc<Observers<ExploreState<T>>>,
    /// List subscribers told about changes the delegate does not see, such
    /// as a reveal that only moves `requested_count`.
    view_observers: Observers<ListState<T>>,
    link: Mutex<Option<Subscription>>,
}

impl<T: ListItem> ExploreStore<T> {
    pub fn new(
        delegate: Arc<dyn ListStore<T>>,
        max_initial_explored_count: usize,
        explore_limit: usize,
    ) -> Result<Self, StoreError> {
        if explore_limit < 1 {
            return Err(StoreError::InvalidExploreLimit(explore_limit));
        }
        let store = Self {
            base: ListStoreDelegate::new(delegate),
            initial_count: max_initial_explored_count,
            explore_limit,
            progress: Arc::new(Mutex::new(Progress {
                state: Arc::new(ExploreState::initial(max_initial_explored_count)),
                source: Arc::new(Vec::new()),
            })),
            observers: Arc::new(Observers::new()),
            view_observers: Observers::new(),
            link: Mutex::new(None),
        };
        store.attach();
        Ok(store)
    }

    pub fn from_config(
        delegate: Arc<dyn ListStore<T>>,
        config: &ExploreConfig,
    ) -> Result<Self, StoreError> {
        Self::new(
            delegate,
            config.max_initial_explored_count,
            config.explore_limit,
        )
    }

    pub fn explore_state(&self) -> Arc<ExploreState<T>> {
        self.progress.lock().state.clone()
    }

    pub fn explored_list(&self) -> Arc<Vec<T>> {
        self.explore_state().explored_list.clone()
    }

    pub fn explored_count(&self) -> usize {
        self.explore_state().explored_count
    }

    pub fn requested_count(&self) -> usize {
        self.explore_state().requested_count
    }

    pub fn subscribe_explored(&self, observer: Observer<ExploreState<T>>) -> Subscription {
        self.observers.subscribe(observer)
    }

    /// Whether the prefix currently follows delegate changes.
    pub fn is_attached(&self) -> bool {
        self.link.lock().is_some()
    }

    fn attach(&self) {
        let mut link = self.link.lock();
        if link.is_some() {
            return;
        }
        let progress = self.progress.clone();
        let observers = self.observers.clone();
        *link = Some(self.base.subscribe(Arc::new(move |state: &ListState<T>| {
            recompute(&progress, &observers, state.items.clone(), None);
        })));
        drop(link);
        recompute(&self.progress, &self.observers, self.base.list(), None);
    }

    fn notify_view(&self) {
        self.view_observers.notify(&self.state());
    }

    fn detach(&self) {
        if let Some(link) = self.link.lock().take() {
            link.dispose();
        }
    }
}

/// Cut the prefix again if the delegate list or the requested count changed.
fn recompute<T: ListItem>(
    progress: &SharedProgress<T>,
    observers: &Observers<ExploreState<T>>,
    list: Arc<Vec<T>>,
    requested: Option<usize>,
) {
    let snapshot = {
        let mut progress = progress.lock();
        let requested_count = requested.unwrap_or(progress.state.requested_count);
        if Arc::ptr_eq(&progress.source, &list) && requested_count == progress.state.requested_count
        {
            return;
        }
        let explored_count = requested_count.min(list.len());
        progress.state = Arc::new(ExploreState {
            explored_list: Arc::new(list[..explored_count].to_vec()),
            requested_count,
            explored_count,
        });
        progress.source = list;
        progress.state.clone()
    };
    observers.notify(&snapshot);
}

/// Everything loaded only when the delegate is exhausted and nothing fetched
/// is still hidden.
fn explore_view<T: ListItem>(state: &ListState<T>, requested_count: usize) -> Option<ListState<T>> {
    let hidden = requested_count < state.items.len();
    if state.is_load_all && hidden {
        let mut adjusted = state.clone();
        adjusted.is_load_all = false;
        Some(adjusted)
    } else {
        None
    }
}

#[async_trait]
impl<T: ListItem> ListStore<T> for ExploreStore<T> {
    fn state(&self) -> Arc<ListState<T>> {
        let state = self.base.state();
        match explore_view(&state, self.requested_count()) {
            Some(adjusted) => Arc::new(adjusted),
            None => state,
        }
    }

    fn subscribe(&self, observer: Observer<ListState<T>>) -> Subscription {
        let progress = self.progress.clone();
        let forward = observer.clone();
        self.base
            .subscribe(Arc::new(move |state: &ListState<T>| {
                let requested_count = progress.lock().state.requested_count;
                match explore_view(state, requested_count) {
                    Some(adjusted) => forward(&adjusted),
                    None => forward(state),
                }
            }))
            .join(self.view_observers.subscribe(observer))
    }

    async fn load(&self) {
        self.attach();
        self.base.load().await
    }

    /// Reveal `explore_limit` more items, fetching only when the fetched list
    /// is shorter than the new prefix.
    async fn load_more(&self) {
        let requested_count = self.requested_count() + self.explore_limit;
        let list = self.base.list();
        recompute(&self.progress, &self.observers, list.clone(), Some(requested_count));
        self.notify_view();
        if requested_count <= list.len() {
            debug!(target: "explore", "revealed {} of {} fetched", requested_count, list.len());
            return;
        }
        self.base.load_more().await
    }

    async fn refresh(&self) {
        self.attach();
        self.base.refresh().await
    }

    fn mutate_items(&self, items: Vec<T>) {
        self.base.mutate_items(items)
    }

    fn mutate_item(&self, index: usize, item: T) {
        self.base.mutate_item(index, item)
    }

    fn remove_item(&self, index: usize) {
        self.base.remove_item(index)
    }

    /// Detaches from the delegate before clearing it; the next `load` or
    /// `refresh` attaches again.
    fn clear(&self) {
        self.detach();
        self.base.clear();
        let snapshot = {
            let mut progress = self.progress.lock();
            progress.state = Arc::new(ExploreState::initial(self.initial_count));
            progress.source = Arc::new(Vec::new());
            progress.state.clone()
        };
        self.observers.notify(&snapshot);
        self.notify_view();
    }

    fn patch_items(&self, patch: &dyn Fn(&T) -> Option<T>) -> usize {
        self.base.patch_items(patch)
    }
}
