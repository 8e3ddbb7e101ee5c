mod common;

use common::UserBackend;
use listsync::application::list::{
    ListStore, SimpleListFetcher, StoreContext, StoreOptions, create_list_store,
};
use listsync::domain::{AppEvent, UserModel};
use listsync::infra::app_config::{ExploreConfig, ListSyncConfig};
use listsync::infra::retry::{RetryPolicy, retry_while_processing};
use listsync::state::AppState;
use std::collections::HashSet;
use std::sync::Arc;

fn fetcher(backend: Arc<UserBackend>, policy: RetryPolicy) -> SimpleListFetcher<UserModel> {
    let first = backend.clone();
    SimpleListFetcher::new(
        move |query: Option<String>| {
            let backend = first.clone();
            async move {
                retry_while_processing(policy, || {
                    let reply = backend.page(query.as_deref(), None);
                    async move { reply }
                })
                .await
            }
        },
        move |cursor: String, query: Option<String>| {
            let backend = backend.clone();
            async move {
                retry_while_processing(policy, || {
                    let reply = backend.page(query.as_deref(), Some(&cursor));
                    async move { reply }
                })
                .await
            }
        },
    )
}

#[tokio::test]
async fn pages_through_whole_backend_without_duplicates() {
    let backend = Arc::new(UserBackend::new(45, 20));
    let load_backend = backend.clone();
    let more_backend = backend.clone();
    let store = create_list_store(
        move |query: Option<String>| {
            let reply = load_backend.page(query.as_deref(), None);
            async move { reply }
        },
        move |cursor: String, query: Option<String>| {
            let reply = more_backend.page(query.as_deref(), Some(&cursor));
            async move { reply }
        },
        StoreOptions::default(),
        StoreContext::default(),
    );

    store.load().await;
    assert_eq!(store.total_count(), Some(45));
    while !store.is_load_all() {
        store.load_more().await;
    }

    let list = store.list();
    let ids: HashSet<&str> = list.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(list.len(), 45);
    assert_eq!(ids.len(), 45);
    assert_eq!(list[44].name, "user045");
    assert_eq!(backend.requests(), 3);

    store.load_more().await;
    assert_eq!(backend.requests(), 3);
}

#[tokio::test(start_paused = true)]
async fn first_load_waits_out_processing_backend() {
    let backend = Arc::new(UserBackend::new(5, 20).processing_for(3));
    let state = AppState::with_config(ListSyncConfig::default());
    let store = state.search_store(|| fetcher(backend.clone(), state.retry_policy()));

    store.load().await;

    assert_eq!(backend.requests(), 4);
    assert_eq!(store.list().len(), 5);
    assert!(store.error().is_none());
    assert!(store.is_load_all());
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_as_error() {
    let backend = Arc::new(UserBackend::new(5, 20).processing_for(10));
    let policy = RetryPolicy {
        max_attempts: 4,
        delay_ms: 500,
    };
    let state = AppState::with_config(ListSyncConfig::default());
    let store = state.search_store(|| fetcher(backend.clone(), policy));

    store.load().await;

    assert_eq!(backend.requests(), 4);
    assert_eq!(store.error().and_then(|e| e.code()), Some(423));
    assert!(store.list().is_empty());
    assert!(store.is_first_loading());
}

#[tokio::test]
async fn search_then_return_to_cached_content() {
    let backend = Arc::new(UserBackend::new(30, 10));
    let state = AppState::with_config(ListSyncConfig::default());
    let store = state.search_store(|| fetcher(backend.clone(), RetryPolicy::default()));

    store.load().await;
    store.load_more().await;
    assert_eq!(store.list().len(), 20);

    store.set_search_mode(true);
    store.search("user01").await;
    let names: Vec<String> = store.list().iter().map(|u| u.name.clone()).collect();
    assert_eq!(names.len(), 10);
    assert!(names.iter().all(|n| n.starts_with("user01")));
    assert!(store.is_load_all());

    let before = backend.requests();
    store.set_search_mode(false);
    assert_eq!(store.list().len(), 20);
    assert_eq!(backend.requests(), before);
}

#[tokio::test]
async fn explore_over_search_store_reveals_then_fetches() {
    let backend = Arc::new(UserBackend::new(30, 10));
    let config = ListSyncConfig {
        explore: ExploreConfig {
            max_initial_explored_count: 3,
            explore_limit: 10,
        },
        ..Default::default()
    };
    let state = AppState::with_config(config);
    let search = state.search_store(|| fetcher(backend.clone(), RetryPolicy::default()));
    let delegate: Arc<dyn ListStore<UserModel>> = search.clone();
    let explore = state.explore_store(delegate).unwrap();

    explore.load().await;
    assert_eq!(explore.explored_count(), 3);
    assert_eq!(backend.requests(), 1);

    explore.load_more().await;
    assert_eq!(explore.requested_count(), 13);
    assert_eq!(backend.requests(), 2);
    assert_eq!(explore.explored_count(), 13);

    explore.load_more().await;
    assert_eq!(backend.requests(), 3);
    assert_eq!(explore.explored_count(), 23);

    explore.load_more().await;
    assert_eq!(explore.explored_count(), 30);
    assert!(explore.is_load_all());
}

#[tokio::test]
async fn follow_event_reaches_content_and_search_lists() {
    let backend = Arc::new(UserBackend::new(12, 20));
    let state = AppState::with_config(ListSyncConfig::default());
    let people = state.search_store(|| fetcher(backend.clone(), RetryPolicy::default()));
    let other = state.search_store(|| fetcher(backend.clone(), RetryPolicy::default()));
    people.load().await;
    other.set_search_mode(true);
    other.search("user011").await;

    let people_dyn: Arc<dyn ListStore<UserModel>> = people.clone();
    let other_dyn: Arc<dyn ListStore<UserModel>> = other.clone();
    let _a = state.bind_events(&people_dyn);
    let _b = state.bind_events(&other_dyn);

    state.events.publish(AppEvent::FollowingStateChanged {
        user_id: "11".into(),
        state: true,
    });

    assert!(people.list()[10].is_following);
    assert!(other.list()[0].is_following);
    assert!(!people.list()[0].is_following);
}
