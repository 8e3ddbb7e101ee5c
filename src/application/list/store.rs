//! Paginated list store.
//!
//! A [`BaseListStore`] owns one fetcher and the list snapshot built from its
//! pages. Every operation publishes a new `Arc<ListState<T>>` to observers.
//!
//! Each `load`/`refresh` start and every `clear` bumps the store generation.
//! A completion carrying an older generation is dropped without touching the
//! snapshot, so a slow reply can never write into a list that has since been
//! reloaded or cleared.

use super::fetcher::{ListFetcher, SimpleListFetcher};
use crate::domain::{ApiReply, Cursor, FetchError, FetchOutcome, FetchResult, ListItem, ListState, Page};
use crate::infra::notify::{ErrorReporter, LoadingGuard, LoadingIndicator, LogErrorReporter};
use crate::infra::observe::{Observer, Observers, Subscription};
use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// Read and write contract shared by every list store and decorator.
#[async_trait]
pub trait ListStore<T: ListItem>: Send + Sync {
    fn state(&self) -> Arc<ListState<T>>;

    /// Register for snapshot changes. The observer stays registered while
    /// the returned guard is alive.
    fn subscribe(&self, observer: Observer<ListState<T>>) -> Subscription;

    async fn load(&self);
    async fn load_more(&self);
    async fn refresh(&self);

    fn mutate_items(&self, items: Vec<T>);
    fn mutate_item(&self, index: usize, item: T);
    fn remove_item(&self, index: usize);
    fn clear(&self);

    /// Replace every item `patch` returns an update for, in each list this
    /// store keeps. Returns how many items changed.
    fn patch_items(&self, patch: &dyn Fn(&T) -> Option<T>) -> usize {
        let list = self.list();
        let mut patched = 0;
        for (index, item) in list.iter().enumerate() {
            if let Some(update) = patch(item) {
                self.mutate_item(index, update);
                patched += 1;
            }
        }
        patched
    }

    fn list(&self) -> Arc<Vec<T>> {
        self.state().items.clone()
    }

    fn total_count(&self) -> Option<u64> {
        self.state().total_count
    }

    fn error(&self) -> Option<FetchError> {
        self.state().error.clone()
    }

    fn is_in_progress(&self) -> bool {
        self.state().is_in_progress()
    }

    fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    fn is_retrying(&self) -> bool {
        self.state().is_retrying
    }

    fn is_loading_more(&self) -> bool {
        self.state().is_loading_more
    }

    fn is_refreshing(&self) -> bool {
        self.state().is_refreshing
    }

    fn is_first_loading(&self) -> bool {
        self.state().is_first_loading
    }

    fn is_load_all(&self) -> bool {
        self.state().is_load_all
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Accept overlapping `load`/`load_more`/`refresh` calls instead of
    /// ignoring calls made while another one is in flight.
    pub parallel_fetch: bool,
}

impl StoreOptions {
    pub fn parallel() -> Self {
        Self {
            parallel_fetch: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Log failures instead of reporting them to the user, and skip the
    /// global loading indicator.
    pub quiet: bool,
}

impl LoadOptions {
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

/// Collaborators a store talks to besides its fetcher.
#[derive(Clone)]
pub struct StoreContext {
    reporter: Arc<dyn ErrorReporter>,
    loading: Option<Arc<dyn LoadingIndicator>>,
}

impl Default for StoreContext {
    fn default() -> Self {
        Self {
            reporter: Arc::new(LogErrorReporter),
            loading: None,
        }
    }
}

impl StoreContext {
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_loading_indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = Some(indicator);
        self
    }

    pub fn reporter(&self) -> &Arc<dyn ErrorReporter> {
        &self.reporter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Load,
    LoadMore,
    Refresh,
}

struct Ticket {
    op: Op,
    generation: u64,
    cursor: Option<String>,
}

struct Inner<T> {
    state: Arc<ListState<T>>,
    generation: u64,
}

pub struct BaseListStore<T> {
    fetcher: Box<dyn ListFetcher<T>>,
    options: StoreOptions,
    context: StoreContext,
    inner: Mutex<Inner<T>>,
    observers: Observers<ListState<T>>,
}

impl<T: ListItem> BaseListStore<T> {
    pub fn new(fetcher: impl ListFetcher<T> + 'static) -> Self {
        Self::with_options(fetcher, StoreOptions::default(), StoreContext::default())
    }

    pub fn with_options(
        fetcher: impl ListFetcher<T> + 'static,
        options: StoreOptions,
        context: StoreContext,
    ) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            options,
            context,
            inner: Mutex::new(Inner {
                state: Arc::new(ListState::default()),
                generation: 0,
            }),
            observers: Observers::new(),
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.live_count()
    }

    /// Fetch the first page and replace the list with it.
    pub async fn load_with(&self, options: LoadOptions) {
        let Some(ticket) = self.start(Op::Load) else {
            return;
        };
        let result = {
            let _loader = match (&self.context.loading, options.quiet) {
                (Some(indicator), false) => Some(LoadingGuard::show(indicator.clone())),
                _ => None,
            };
            self.fetcher.fetch_data(false).await
        };
        self.finish(ticket, result, !options.quiet, true);
    }

    /// Fetch the page after the current cursor and append it. `validator`
    /// runs right before the page is committed; returning `false` drops it.
    pub async fn load_more_validated(&self, validator: impl FnOnce() -> bool + Send) {
        let Some(ticket) = self.start(Op::LoadMore) else {
            return;
        };
        let Some(cursor) = ticket.cursor.clone() else {
            return;
        };
        let result = self.fetcher.fetch_more(&cursor).await;
        let accepted = validator();
        self.finish(ticket, result, true, accepted);
    }

    fn start(&self, op: Op) -> Option<Ticket> {
        let (ticket, snapshot) = {
            let mut inner = self.inner.lock();
            if !self.options.parallel_fetch && inner.state.is_in_progress() {
                debug!(target: "list", "{:?} ignored, another fetch is in flight", op);
                return None;
            }
            let mut state = (*inner.state).clone();
            let cursor = match op {
                Op::Load => {
                    if state.error.is_some() {
                        state.is_retrying = true;
                    }
                    state.is_loading = true;
                    inner.generation += 1;
                    None
                }
                Op::Refresh => {
                    state.is_refreshing = true;
                    inner.generation += 1;
                    None
                }
                Op::LoadMore => {
                    let token = match (&state.cursor, state.is_load_all) {
                        (Cursor::Next(token), false) => token.clone(),
                        _ => {
                            debug!(target: "list", "load more ignored, cursor {:?}", state.cursor);
                            return None;
                        }
                    };
                    state.is_loading_more = true;
                    Some(token)
                }
            };
            inner.state = Arc::new(state);
            let ticket = Ticket {
                op,
                generation: inner.generation,
                cursor,
            };
            (ticket, inner.state.clone())
        };
        self.observers.notify(&snapshot);
        Some(ticket)
    }

    fn finish(&self, ticket: Ticket, result: FetchResult<T>, report: bool, accepted: bool) {
        let (snapshot, failure) = {
            let mut inner = self.inner.lock();
            if inner.generation != ticket.generation {
                debug!(target: "list", "{:?} superseded, dropping its result", ticket.op);
                return;
            }
            if ticket.op == Op::LoadMore && inner.state.cursor.token() != ticket.cursor.as_deref() {
                debug!(target: "list", "cursor moved while loading more, dropping page");
                return;
            }
            let mut state = (*inner.state).clone();
            state.reset_progress();
            let failure = match result {
                Ok(FetchOutcome::Page(page)) if accepted => {
                    commit_page(&mut state, page, ticket.op == Op::LoadMore);
                    None
                }
                Ok(FetchOutcome::Page(_)) => {
                    debug!(target: "list", "page rejected by validator");
                    None
                }
                Ok(FetchOutcome::Stale) => {
                    debug!(target: "list", "{:?} returned a stale result", ticket.op);
                    None
                }
                Err(err) => {
                    state.error = Some(err.clone());
                    Some(err)
                }
            };
            inner.state = Arc::new(state);
            (inner.state.clone(), failure)
        };
        self.observers.notify(&snapshot);

        if let Some(err) = failure {
            if report {
                self.context.reporter.report(&err);
            } else {
                warn!(target: "list", "{:?} error: {}", ticket.op, err);
            }
        }
    }

    fn update(&self, change: impl FnOnce(&mut ListState<T>) -> bool) {
        let snapshot = {
            let mut inner = self.inner.lock();
            let mut state = (*inner.state).clone();
            if !change(&mut state) {
                return;
            }
            inner.state = Arc::new(state);
            inner.state.clone()
        };
        self.observers.notify(&snapshot);
    }
}

fn commit_page<T: Clone>(state: &mut ListState<T>, page: Page<T>, append: bool) {
    if append {
        state.is_load_all = page.cursor.is_none() || page.items.is_empty();
        let mut items = Vec::with_capacity(state.items.len() + page.items.len());
        items.extend(state.items.iter().cloned());
        items.extend(page.items);
        state.items = Arc::new(items);
    } else {
        state.is_load_all = page.cursor.is_none();
        state.items = Arc::new(page.items);
        state.total_count = page.total_count;
    }
    state.cursor = Cursor::from(page.cursor);
    state.is_first_loading = false;
    state.error = None;
}

#[async_trait]
impl<T: ListItem> ListStore<T> for BaseListStore<T> {
    fn state(&self) -> Arc<ListState<T>> {
        self.inner.lock().state.clone()
    }

    fn subscribe(&self, observer: Observer<ListState<T>>) -> Subscription {
        self.observers.subscribe(observer)
    }

    async fn load(&self) {
        self.load_with(LoadOptions::default()).await
    }

    async fn load_more(&self) {
        self.load_more_validated(|| true).await
    }

    async fn refresh(&self) {
        let Some(ticket) = self.start(Op::Refresh) else {
            return;
        };
        let result = self.fetcher.fetch_data(true).await;
        self.finish(ticket, result, true, true);
    }

    fn mutate_items(&self, items: Vec<T>) {
        self.update(|state| {
            state.items = Arc::new(items);
            true
        });
    }

    fn mutate_item(&self, index: usize, item: T) {
        self.update(|state| {
            if index >= state.items.len() {
                debug!(target: "list", "mutate_item out of range: {}", index);
                return false;
            }
            let mut items = (*state.items).clone();
            items[index] = item;
            state.items = Arc::new(items);
            true
        });
    }

    fn remove_item(&self, index: usize) {
        self.update(|state| {
            if index >= state.items.len() {
                return false;
            }
            let mut items = (*state.items).clone();
            items.remove(index);
            state.items = Arc::new(items);
            true
        });
    }

    fn clear(&self) {
        let snapshot = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state = Arc::new(ListState::default());
            inner.state.clone()
        };
        self.observers.notify(&snapshot);
    }
}

/// Store over a [`SimpleListFetcher`] built from two fetch functions.
pub fn create_list_store<T, L, LFut, M, MFut>(
    load: L,
    load_more: M,
    options: StoreOptions,
    context: StoreContext,
) -> BaseListStore<T>
where
    T: ListItem,
    L: Fn(Option<String>) -> LFut + Send + Sync + 'static,
    LFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
    M: Fn(String, Option<String>) -> MFut + Send + Sync + 'static,
    MFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
{
    BaseListStore::with_options(SimpleListFetcher::new(load, load_more), options, context)
}
