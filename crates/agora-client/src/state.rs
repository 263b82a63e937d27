//! Every mounted widget, in one place.
//!
//! [`AppState`] owns one store per widget plus the controllers that drive
//! the timer-based ones. Widgets never share state with each other; this is
//! only a registry so that a host can mount and tear down the whole page.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use agora_store::comments::CommentFeed;
use agora_store::feed::FeedState;
use agora_store::forum::ForumThread;
use agora_store::poll::PollCreator;
use agora_store::qa::QaBoard;
use agora_store::rsvp::EventRsvp;
use agora_store::Store;

use crate::chat::ChatController;
use crate::composer::{MicroPostComposer, ProfileComposer};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::feed::{FeedController, MockFeedSource};
use crate::posts::PostFeedController;
use crate::sinks::SubmissionSink;

const FEED_RNG_STREAM: u64 = 1;
const MARKER_RNG_STREAM: u64 = 2;

pub struct AppState {
    pub config: ClientConfig,

    pub comments: Store<CommentFeed>,
    pub forum: Store<ForumThread>,
    pub rsvp: Store<EventRsvp>,
    pub poll: Store<PollCreator>,
    pub qa: Store<QaBoard>,

    pub chat: ChatController,
    pub feed: FeedController<MockFeedSource>,
    pub posts: PostFeedController,
    pub micro_post: MicroPostComposer,
    pub profile: ProfileComposer,
}

impl AppState {
    /// Mount every widget on the current tokio runtime.
    pub fn mount(config: ClientConfig, sink: Arc<dyn SubmissionSink>) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::mount_on(config, sink, runtime))
    }

    pub fn mount_on(config: ClientConfig, sink: Arc<dyn SubmissionSink>, runtime: Handle) -> Self {
        let feed_store = Store::with_state(FeedState::with_max_pages(config.feed_max_pages));
        let feed_source = MockFeedSource::new(config.rng(FEED_RNG_STREAM));

        let state = Self {
            comments: Store::new(),
            forum: Store::new(),
            rsvp: Store::new(),
            poll: Store::new(),
            qa: Store::new(),
            chat: ChatController::new(Store::new(), &config, runtime.clone()),
            feed: FeedController::new(feed_store, feed_source, &config, runtime.clone()),
            posts: PostFeedController::new(
                Store::new(),
                config.rng(MARKER_RNG_STREAM),
                &config,
                runtime,
            ),
            micro_post: MicroPostComposer::new(Store::new(), Arc::clone(&sink)),
            profile: ProfileComposer::new(Store::new(), sink),
            config,
        };
        info!("Mounted all widgets");
        state
    }

    /// Cancel every pending timer and detach every controller.
    pub fn unmount(&self) {
        self.chat.unmount();
        self.feed.unmount();
        self.posts.unmount();
        info!("Unmounted all widgets");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use agora_shared::ReactionKind;
    use agora_store::forum::ForumAction;
    use tokio::time::sleep;

    use crate::sinks::RecordingSink;

    fn mount() -> AppState {
        let config = ClientConfig {
            rng_seed: Some(1),
            ..ClientConfig::default()
        };
        AppState::mount(config, Arc::new(RecordingSink::new())).unwrap()
    }

    #[test]
    fn test_mount_requires_runtime() {
        let result = AppState::mount(ClientConfig::default(), Arc::new(RecordingSink::new()));
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_widgets_are_independent() {
        let app = mount();
        let comments_before = app.comments.snapshot();

        app.forum.dispatch(ForumAction::React {
            post_id: "2".into(),
            kind: ReactionKind::Laugh,
        });
        app.posts.like("1").unwrap();

        assert!(Arc::ptr_eq(&comments_before, &app.comments.snapshot()));
        assert_eq!(app.forum.snapshot().posts[1].reactions.total(), 13);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_all_timers() {
        let app = mount();
        app.chat.keystroke();
        app.feed.on_sentinel_visible();
        app.posts.like("2").unwrap();
        app.unmount();

        sleep(Duration::from_millis(5000)).await;
        assert!(app.feed.store().snapshot().posts.is_empty());
        assert_eq!(app.posts.store().snapshot().markers.len(), 1);
        assert_eq!(app.chat.store().snapshot().messages.len(), 3);
    }
}
