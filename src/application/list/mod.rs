//! Cursor-paginated list stores.
//!
//! `BaseListStore` owns a fetcher and the pages it returned. `SearchListStore`
//! switches between unfiltered and query-bound content, `ExploreStore` reveals
//! a growing prefix of another store, and `ListStoreDelegate` is the
//! forwarding base decorators build on. All of them implement [`ListStore`].

pub mod delegate;
pub mod explore;
pub mod fetcher;
pub mod search;
pub mod store;
pub mod sync;


pub use delegate::ListStoreDelegate;
pub use explore::{ExploreState, ExploreStore};
pub use fetcher::{ListFetcher, PageFuture, QueryListFetcher, SimpleListFetcher};
pub use search::SearchListStore;
pub use store::{
    BaseListStore, ListStore, LoadOptions, StoreContext, StoreOptions, create_list_store,
};
pub use sync::{apply_event, bind_to_events};
