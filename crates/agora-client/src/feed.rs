//! Infinite-scroll loading for the social feed.
//!
//! The renderer reports sentinel visibility; the controller turns that into
//! at most one in-flight page fetch at a time.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::runtime::Handle;
use tracing::{debug, info};

use agora_store::feed::{generate_page, FeedAction, FeedPost, SocialFeed};
use agora_store::Store;

use crate::config::ClientConfig;
use crate::timers::Timers;

/// Where feed pages come from. Only a mock exists; a server-backed source
/// would implement the same call.
pub trait FeedSource: Send + 'static {
    fn fetch_page(&mut self, page: u32, count: usize) -> Vec<FeedPost>;
}

/// Generates pages locally from a seedable RNG.
pub struct MockFeedSource {
    rng: StdRng,
}

impl MockFeedSource {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl FeedSource for MockFeedSource {
    fn fetch_page(&mut self, page: u32, count: usize) -> Vec<FeedPost> {
        generate_page(page, count, &mut self.rng)
    }
}

pub struct FeedController<S: FeedSource> {
    store: Store<SocialFeed>,
    source: Arc<Mutex<S>>,
    fetches: Timers<u32>,
    fetch_delay: Duration,
    page_size: usize,
}

impl<S: FeedSource> FeedController<S> {
    pub fn new(
        store: Store<SocialFeed>,
        source: S,
        config: &ClientConfig,
        runtime: Handle,
    ) -> Self {
        info!(widget = "feed", "Feed controller mounted");
        Self {
            store,
            source: Arc::new(Mutex::new(source)),
            fetches: Timers::new(runtime),
            fetch_delay: config.feed_fetch_delay,
            page_size: config.feed_page_size,
        }
    }

    pub fn store(&self) -> &Store<SocialFeed> {
        &self.store
    }

    /// The end-of-list sentinel scrolled into view. Starts a fetch unless one
    /// is already running or the feed is exhausted; returns whether it did.
    pub fn on_sentinel_visible(&self) -> bool {
        if !self.store.dispatch(FeedAction::BeginLoad) {
            return false;
        }
        let page = self.store.snapshot().page;
        debug!(page, "Fetching feed page");

        let store = self.store.clone();
        let source = Arc::clone(&self.source);
        let count = self.page_size;
        self.fetches.schedule(page, self.fetch_delay, move || {
            let posts = source
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .fetch_page(page, count);
            store.dispatch(FeedAction::PageLoaded { page, posts });
        });
        true
    }

    pub fn is_fetching(&self) -> bool {
        self.fetches.pending_count() > 0
    }

    /// Abort an in-flight fetch and release the store's loading flag, so the
    /// store can be driven again by a later controller.
    pub fn unmount(&self) {
        self.abort_fetch();
        info!(widget = "feed", "Feed controller unmounted");
    }

    fn abort_fetch(&self) {
        self.fetches.cancel_all();
        if self.store.dispatch(FeedAction::CancelLoad) {
            debug!("Abandoned in-flight feed page");
        }
    }
}

impl<S: FeedSource> Drop for FeedController<S> {
    fn drop(&mut self) {
        self.abort_fetch();
    }
}
