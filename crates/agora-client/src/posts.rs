//! Like bursts on the post feed: each like gets a floating marker that
//! expires on its own timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::runtime::Handle;
use tracing::info;

use agora_shared::constants::{LIKE_EMOJIS, MARKER_X_MAX, MARKER_X_MIN};
use agora_store::posts::{LikeMarker, PostAction, PostFeed};
use agora_store::Store;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::timers::Timers;

pub struct PostFeedController {
    store: Store<PostFeed>,
    markers: Timers<u64>,
    next_marker_id: AtomicU64,
    rng: Mutex<StdRng>,
    marker_lifetime: Duration,
}

impl PostFeedController {
    pub fn new(
        store: Store<PostFeed>,
        rng: StdRng,
        config: &ClientConfig,
        runtime: Handle,
    ) -> Self {
        info!(widget = "posts", "Post feed controller mounted");
        Self {
            store,
            markers: Timers::new(runtime),
            next_marker_id: AtomicU64::new(1),
            rng: Mutex::new(rng),
            marker_lifetime: config.marker_lifetime,
        }
    }

    pub fn store(&self) -> &Store<PostFeed> {
        &self.store
    }

    /// Like a post. Returns the id of the spawned marker.
    pub fn like(&self, post_id: &str) -> Result<u64> {
        if !self.store.snapshot().posts.iter().any(|p| p.id == post_id) {
            return Err(ClientError::NotFound(format!("post {post_id}")));
        }

        let id = self.next_marker_id.fetch_add(1, Ordering::Relaxed);
        let (emoji, x) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let emoji = LIKE_EMOJIS.choose(&mut *rng).copied().unwrap_or("❤️");
            (emoji, rng.gen_range(MARKER_X_MIN..MARKER_X_MAX))
        };

        let marker = LikeMarker {
            id,
            post_id: post_id.to_string(),
            emoji: emoji.to_string(),
            x,
        };
        if !self.store.dispatch(PostAction::Like {
            post_id: post_id.to_string(),
            marker,
        }) {
            return Err(ClientError::NotFound(format!("post {post_id}")));
        }

        let store = self.store.clone();
        self.markers.schedule(id, self.marker_lifetime, move || {
            store.dispatch(PostAction::ExpireMarker { marker_id: id });
        });
        Ok(id)
    }

    pub fn live_markers(&self) -> usize {
        self.markers.pending_count()
    }

    pub fn unmount(&self) {
        self.markers.cancel_all();
        info!(widget = "posts", "Post feed controller unmounted");
    }
}

impl Drop for PostFeedController {
    fn drop(&mut self) {
        self.markers.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tokio::time::sleep;

    fn mount() -> PostFeedController {
        PostFeedController::new(
            Store::new(),
            StdRng::seed_from_u64(5),
            &ClientConfig::default(),
            Handle::current(),
        )
    }

    fn marker_ids(posts: &PostFeedController) -> Vec<u64> {
        posts.store().snapshot().markers.iter().map(|m| m.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_placement() {
        let posts = mount();
        for _ in 0..20 {
            posts.like("1").unwrap();
        }
        let state = posts.store().snapshot();
        assert_eq!(state.posts[0].likes, 144);
        for marker in &state.markers {
            assert!((MARKER_X_MIN..MARKER_X_MAX).contains(&marker.x));
            assert!(LIKE_EMOJIS.contains(&marker.emoji.as_str()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_markers_expire_independently() {
        let posts = mount();
        let first = posts.like("1").unwrap();
        sleep(Duration::from_millis(500)).await;
        let second = posts.like("1").unwrap();
        let third = posts.like("2").unwrap();
        assert_eq!(marker_ids(&posts), [first, second, third]);

        sleep(Duration::from_millis(1600)).await;
        assert_eq!(marker_ids(&posts), [second, third]);
        assert_eq!(posts.live_markers(), 2);

        sleep(Duration::from_millis(500)).await;
        assert!(marker_ids(&posts).is_empty());
        // Likes stay counted.
        assert_eq!(posts.store().snapshot().posts[0].likes, 126);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_post_spawns_nothing() {
        let posts = mount();
        let err = posts.like("nope").unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref what) if what == "post nope"));
        assert_eq!(posts.live_markers(), 0);
        assert!(posts.store().snapshot().markers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_leaves_markers() {
        let posts = mount();
        posts.like("3").unwrap();
        posts.unmount();
        sleep(Duration::from_millis(3000)).await;
        assert_eq!(marker_ids(&posts).len(), 1);
    }
}
