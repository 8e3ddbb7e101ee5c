//! listsync demo CLI.
//!
//! Drives the list stores against an in-memory user directory: pages through
//! the content list, optionally switches to search mode, or reveals the list
//! progressively.

use anyhow::Result;
use clap::Parser;
use listsync::application::list::{ExploreStore, ListStore, SimpleListFetcher};
use listsync::domain::{AppEvent, ApiReply, PROCESSING_STATUS, Page, UserModel};
use listsync::infra::app_config::{load_config, load_config_from};
use listsync::infra::retry::{RetryPolicy, retry_while_processing};
use listsync::state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Parser, Debug)]
#[command(name = "listsync")]
#[command(version)]
#[command(about = "Paginated list synchronization demo", long_about = None)]
struct Args {
    /// Number of users in the in-memory directory
    #[arg(long, default_value_t = 45)]
    total: usize,

    /// Page size (overrides the configured one)
    #[arg(long)]
    page_size: Option<u32>,

    /// Switch to search mode and search for this text after loading
    #[arg(long)]
    search: Option<String>,

    /// Reveal the list progressively instead of paging through it
    #[arg(long)]
    explore: bool,

    /// Config file (defaults to LISTSYNC_CONFIG_PATH or the data dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Answer 423 to this many requests before serving data
    #[arg(long, default_value_t = 0)]
    processing: u32,
}

/// Users served by offset cursors, filtered by name when a query is bound.
struct Directory {
    users: Vec<UserModel>,
    page_size: usize,
    processing_left: AtomicU32,
}

impl Directory {
    fn new(total: usize, page_size: usize, processing: u32) -> Self {
        let users = (1..=total)
            .map(|n| UserModel {
                id: n.to_string(),
                name: format!("user{:03}", n),
                is_following: false,
            })
            .collect();
        Self {
            users,
            page_size: page_size.max(1),
            processing_left: AtomicU32::new(processing),
        }
    }

    fn page(&self, query: Option<&str>, cursor: Option<&str>) -> ApiReply<Page<UserModel>> {
        let processing = self
            .processing_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if processing.is_ok() {
            return ApiReply::failed("still processing", Some(PROCESSING_STATUS));
        }

        let offset = match cursor.map(str::parse::<usize>) {
            None => 0,
            Some(Ok(offset)) => offset,
            Some(Err(_)) => return ApiReply::failed("invalid cursor", Some(400)),
        };
        let matching: Vec<&UserModel> = self
            .users
            .iter()
            .filter(|user| query.is_none_or(|q| user.name.contains(q)))
            .collect();
        let start = offset.min(matching.len());
        let end = (start + self.page_size).min(matching.len());
        let items = matching[start..end].iter().map(|user| (*user).clone()).collect();
        let next = (end < matching.len()).then(|| end.to_string());
        ApiReply::Data(Page::new(items, next).with_total(matching.len() as u64))
    }
}

fn directory_fetcher(directory: Arc<Directory>, policy: RetryPolicy) -> SimpleListFetcher<UserModel> {
    let first = directory.clone();
    SimpleListFetcher::new(
        move |query: Option<String>| {
            let directory = first.clone();
            async move {
                retry_while_processing(policy, || {
                    let reply = directory.page(query.as_deref(), None);
                    async move { reply }
                })
                .await
            }
        },
        move |cursor: String, query: Option<String>| {
            let directory = directory.clone();
            async move {
                retry_while_processing(policy, || {
                    let reply = directory.page(query.as_deref(), Some(&cursor));
                    async move { reply }
                })
                .await
            }
        },
    )
}

fn print_list(label: &str, store: &dyn ListStore<UserModel>) {
    let list = store.list();
    let names: Vec<&str> = list.iter().map(|user| user.name.as_str()).collect();
    println!(
        "{}: {} item(s), total {:?}, load_all={}",
        label,
        names.len(),
        store.total_count(),
        store.is_load_all()
    );
    if let Some(err) = store.error() {
        println!("  error: {}", err);
    }
    println!("  {}", names.join(", "));
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    log::info!(
        "page size {}, retry {}x{}ms",
        config.page_size,
        config.retry.max_attempts,
        config.retry.delay_ms
    );

    let state = AppState::with_config(config);
    let directory = Arc::new(Directory::new(
        args.total,
        state.page_size() as usize,
        args.processing,
    ));
    let policy = state.retry_policy();
    let store = state.search_store(|| directory_fetcher(directory.clone(), policy));
    let store_dyn: Arc<dyn ListStore<UserModel>> = store.clone();
    let _events = state.bind_events(&store_dyn);

    if args.explore {
        let explore: ExploreStore<UserModel> = state.explore_store(store_dyn.clone())?;
        explore.load().await;
        println!("explored {} of {}", explore.explored_count(), explore.list().len());
        while !explore.is_load_all() && explore.error().is_none() {
            explore.load_more().await;
            println!("explored {} of {}", explore.explored_count(), explore.list().len());
        }
        return Ok(());
    }

    store.load().await;
    while !store.is_load_all() && store.error().is_none() {
        store.load_more().await;
    }
    print_list("content", store.as_ref());

    state.events.publish(AppEvent::FollowingStateChanged {
        user_id: "1".into(),
        state: true,
    });
    if let Some(first) = store.list().first() {
        println!("{} following: {}", first.name, first.is_following);
    }

    if let Some(query) = args.search {
        store.set_search_mode(true);
        store.search(&query).await;
        print_list(&format!("search {:?}", query), store.as_ref());
        store.set_search_mode(false);
        print_list("content again", store.as_ref());
    }

    Ok(())
}
