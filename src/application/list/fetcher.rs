//! Page fetchers: the seam between list stores and the REST client.

use crate::domain::{ApiReply, FetchOutcome, FetchResult, ListItem, Page};
use async_trait::async_trait;
use futures::future::BoxFuture;
use log::debug;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// Fetches the first page of a list and continues from a cursor.
#[async_trait]
pub trait ListFetcher<T>: Send + Sync {
    /// `refresh` is true for a user-initiated refresh.
    async fn fetch_data(&self, refresh: bool) -> FetchResult<T>;

    /// `cursor` is the token of the last committed page.
    async fn fetch_more(&self, cursor: &str) -> FetchResult<T>;
}

/// A fetcher whose results depend on a settable text query.
pub trait QueryListFetcher<T>: ListFetcher<T> {
    fn query(&self) -> Option<String>;

    /// Bind a new query. Requests started under the previous query resolve
    /// to [`FetchOutcome::Stale`].
    fn set_query(&self, query: Option<String>);
}

#[async_trait]
impl<T: ListItem, F: ListFetcher<T> + ?Sized> ListFetcher<T> for Arc<F> {
    async fn fetch_data(&self, refresh: bool) -> FetchResult<T> {
        (**self).fetch_data(refresh).await
    }

    async fn fetch_more(&self, cursor: &str) -> FetchResult<T> {
        (**self).fetch_more(cursor).await
    }
}

impl<T: ListItem, F: QueryListFetcher<T> + ?Sized> QueryListFetcher<T> for Arc<F> {
    fn query(&self) -> Option<String> {
        (**self).query()
    }

    fn set_query(&self, query: Option<String>) {
        (**self).set_query(query)
    }
}

pub type PageFuture<T> = BoxFuture<'static, ApiReply<Page<T>>>;
type LoadFn<T> = Arc<dyn Fn(Option<String>) -> PageFuture<T> + Send + Sync>;
type LoadMoreFn<T> = Arc<dyn Fn(String, Option<String>) -> PageFuture<T> + Send + Sync>;

#[derive(Debug, Default, Clone)]
struct QueryBinding {
    query: Option<String>,
    generation: u64,
}

/// [`QueryListFetcher`] built from two fetch functions: `(query)` for the
/// first page and `(cursor, query)` for the following ones.
///
/// The query is read when a request starts. Each query change bumps a
/// generation; a reply whose generation is no longer current is `Stale`.
pub struct SimpleListFetcher<T> {
    load: LoadFn<T>,
    load_more: LoadMoreFn<T>,
    binding: Mutex<QueryBinding>,
}

impl<T: ListItem> SimpleListFetcher<T> {
    pub fn new<L, LFut, M, MFut>(load: L, load_more: M) -> Self
    where
        L: Fn(Option<String>) -> LFut + Send + Sync + 'static,
        LFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
        M: Fn(String, Option<String>) -> MFut + Send + Sync + 'static,
        MFut: Future<Output = ApiReply<Page<T>>> + Send + 'static,
    {
        Self {
            load: Arc::new(move |query| Box::pin(load(query))),
            load_more: Arc::new(move |cursor, query| Box::pin(load_more(cursor, query))),
            binding: Mutex::new(QueryBinding::default()),
        }
    }

    fn binding(&self) -> QueryBinding {
        self.binding.lock().clone()
    }

    fn resolve(&self, started: u64, reply: ApiReply<Page<T>>) -> FetchResult<T> {
        if self.binding.lock().generation != started {
            debug!(target: "list", "query changed while fetching, dropping reply");
            return Ok(FetchOutcome::Stale);
        }
        match reply {
            ApiReply::Data(page) => Ok(FetchOutcome::Page(page)),
            ApiReply::Failed(err) => Err(err),
            ApiReply::Cancelled => Ok(FetchOutcome::Stale),
        }
    }
}

#[async_trait]
impl<T: ListItem> ListFetcher<T> for SimpleListFetcher<T> {
    async fn fetch_data(&self, _refresh: bool) -> FetchResult<T> {
        let binding = self.binding();
        let reply = (self.load)(binding.query).await;
        self.resolve(binding.generation, reply)
    }

    async fn fetch_more(&self, cursor: &str) -> FetchResult<T> {
        let binding = self.binding();
        let reply = (self.load_more)(cursor.to_string(), binding.query).await;
        self.resolve(binding.generation, reply)
    }
}

impl<T: ListItem> QueryListFetcher<T> for SimpleListFetcher<T> {
    fn query(&self) -> Option<String> {
        self.binding.lock().query.clone()
    }

    fn set_query(&self, query: Option<String>) {
        let mut binding = self.binding.lock();
        if binding.query == query {
            return;
        }
        binding.query = query;
        binding.generation += 1;
    }
}
