//! Infinite-scroll social feed.
//!
//! The store only tracks the paging state machine: `BeginLoad` marks a fetch
//! as in flight (and refuses a second one), `PageLoaded` appends a batch and
//! advances the cursor. Timing and the page source live in the client.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use agora_shared::constants::FEED_MAX_PAGES;
use agora_shared::ReactionKind;

use crate::reactions::{ReactionCounts, ReactionSummary, Reactions};
use crate::store::{find_mut, Widget};

const NATURE_SENTENCES: [&str; 10] = [
    "The sunset at the beach yesterday was breathtaking.",
    "I saw a peacock dancing in the rain this morning!",
    "The monsoon has brought so much greenery to our village.",
    "Birdsong in the early morning always lifts my spirits.",
    "Mountains are calling, and I must go.",
    "Spotted a rainbow after the evening drizzle 🌈",
    "Nature walks are the best therapy.",
    "There's nothing more peaceful than watching clouds roll by.",
    "Freshly bloomed flowers make my day.",
    "The river near my home is flowing full and fast!",
];

const EVENT_MENTIONS: [&str; 5] = [
    "Can't wait for the EcoFest 2025 next weekend!",
    "Who else is going to the Nature Connect meet-up this Friday?",
    "Looking forward to volunteering at the Tree Plantation Drive 🌱",
    "I'm prepping my speech for the Green Future Summit!",
    "The Wildlife Photography Expo is just 3 days away!",
];

const IMAGES: [&str; 5] = ["/p3.jpg", "/p4.jpg", "/p5.jpg", "/p6.jpg", "/p7.jpg"];

/// Exclusive upper bound of the random seed count per reaction kind.
const REACTION_CEILINGS: [u32; 6] = [50, 30, 20, 10, 5, 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub image: Option<String>,
    pub timestamp: String,
    pub reactions: Reactions,
}

/// Generate one page of mock posts. Ids are `"{page}-{index}"`.
pub fn generate_page<R: Rng + ?Sized>(page: u32, count: usize, rng: &mut R) -> Vec<FeedPost> {
    (0..count)
        .map(|i| {
            let nature = NATURE_SENTENCES.choose(rng).copied().unwrap_or_default();
            let event = EVENT_MENTIONS.choose(rng).copied().unwrap_or_default();
            let counts: Vec<(ReactionKind, u32)> = ReactionKind::ALL
                .into_iter()
                .zip(REACTION_CEILINGS)
                .map(|(kind, ceiling)| (kind, rng.gen_range(0..ceiling)))
                .collect();

            FeedPost {
                id: format!("{page}-{i}"),
                author: format!("User {}", rng.gen_range(0..100)),
                avatar: format!("/q{}.png", rng.gen_range(1..=8)),
                content: format!("{nature} {event}"),
                image: IMAGES.choose(rng).map(|s| s.to_string()),
                timestamp: format!("{} hours ago", rng.gen_range(0..24)),
                reactions: Reactions::new(ReactionCounts::from_pairs(counts)),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedState {
    pub posts: Vec<Arc<FeedPost>>,
    /// Next page to fetch.
    pub page: u32,
    pub loading: bool,
    pub has_more: bool,
    /// Last page that will ever be fetched.
    pub max_pages: u32,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::with_max_pages(FEED_MAX_PAGES)
    }
}

impl FeedState {
    pub fn with_max_pages(max_pages: u32) -> Self {
        Self {
            posts: Vec::new(),
            page: 1,
            loading: false,
            has_more: max_pages > 0,
            max_pages,
        }
    }

    /// Mark a fetch as in flight. Refused while one already is, or once the
    /// feed is exhausted.
    pub fn begin_load(&mut self) -> bool {
        if self.loading || !self.has_more {
            return false;
        }
        self.loading = true;
        true
    }

    /// Drop an in-flight fetch without appending anything.
    pub fn cancel_load(&mut self) -> bool {
        if !self.loading {
            return false;
        }
        self.loading = false;
        true
    }

    /// Append the batch for `page`. Only the page currently being fetched is
    /// accepted.
    pub fn page_loaded(&mut self, page: u32, posts: Vec<FeedPost>) -> bool {
        if !self.loading || page != self.page {
            return false;
        }
        self.posts.extend(posts.into_iter().map(Arc::new));
        self.page += 1;
        if page >= self.max_pages {
            self.has_more = false;
        }
        self.loading = false;
        true
    }

    pub fn react(&mut self, post_id: &str, kind: ReactionKind) -> bool {
        match find_mut(&mut self.posts, |p| p.id == post_id) {
            Some(post) => {
                post.reactions.set_reaction(kind);
                true
            }
            None => false,
        }
    }

    /// Reaction totals across every loaded post.
    pub fn aggregated_reactions(&self) -> ReactionCounts {
        let mut total = ReactionCounts::new();
        for post in &self.posts {
            total.accumulate(&post.reactions.counts);
        }
        total
    }
}

#[derive(Debug)]
pub enum FeedAction {
    BeginLoad,
    PageLoaded { page: u32, posts: Vec<FeedPost> },
    CancelLoad,
    React { post_id: String, kind: ReactionKind },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub posts: Vec<Arc<FeedPost>>,
    pub loading: bool,
    pub has_more: bool,
    /// Pages appended so far.
    pub pages_loaded: u32,
    pub aggregated_reactions: ReactionCounts,
    /// Emoji bar for the aggregated totals, zero counts left out.
    pub reaction_summary: Vec<ReactionSummary>,
    /// "You've reached the end" banner.
    pub reached_end: bool,
}

pub struct SocialFeed;

impl Widget for SocialFeed {
    const NAME: &'static str = "feed";

    type State = FeedState;
    type Action = FeedAction;
    type View = FeedView;

    fn seed() -> FeedState {
        FeedState::default()
    }

    fn reduce(state: &mut FeedState, action: FeedAction) -> bool {
        match action {
            FeedAction::BeginLoad => state.begin_load(),
            FeedAction::PageLoaded { page, posts } => state.page_loaded(page, posts),
            FeedAction::CancelLoad => state.cancel_load(),
            FeedAction::React { post_id, kind } => state.react(&post_id, kind),
        }
    }

    fn project(state: &FeedState) -> FeedView {
        let aggregated = state.aggregated_reactions();
        FeedView {
            posts: state.posts.clone(),
            loading: state.loading,
            has_more: state.has_more,
            pages_loaded: state.page - 1,
            reaction_summary: aggregated.summary(),
            aggregated_reactions: aggregated,
            reached_end: !state.has_more && !state.posts.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn load(store: &Store<SocialFeed>, rng: &mut StdRng) -> bool {
        if !store.dispatch(FeedAction::BeginLoad) {
            return false;
        }
        let page = store.snapshot().page;
        store.dispatch(FeedAction::PageLoaded {
            page,
            posts: generate_page(page, 5, rng),
        })
    }

    #[test]
    fn test_generate_page_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let posts = generate_page(3, 5, &mut rng);
        assert_eq!(posts.len(), 5);
        assert_eq!(posts[0].id, "3-0");
        assert_eq!(posts[4].id, "3-4");
        for post in &posts {
            assert!(post.reactions.counts.get(ReactionKind::Angry) < 3);
            assert!(post.reactions.counts.get(ReactionKind::Like) < 50);
            assert!(post.author.starts_with("User "));
            assert!(post.image.is_some());
            assert_eq!(post.reactions.user_reaction, None);
        }
    }

    #[test]
    fn test_pages_stop_at_ceiling() {
        let store: Store<SocialFeed> = Store::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(store.snapshot().page, 1);

        for _ in 0..5 {
            assert!(load(&store, &mut rng));
        }
        assert!(!load(&store, &mut rng));

        let state = store.snapshot();
        assert_eq!(state.posts.len(), 25);
        assert!(!state.has_more);
        let first_ids: Vec<&str> = state.posts.iter().step_by(5).map(|p| p.id.as_str()).collect();
        assert_eq!(first_ids, ["1-0", "2-0", "3-0", "4-0", "5-0"]);
        assert!(store.view().reached_end);
    }

    #[test]
    fn test_overlapping_load_is_refused() {
        let store: Store<SocialFeed> = Store::new();
        assert!(store.dispatch(FeedAction::BeginLoad));
        assert!(!store.dispatch(FeedAction::BeginLoad));
        assert!(store.view().loading);
    }

    #[test]
    fn test_stale_page_is_refused() {
        let mut state = FeedState::default();
        assert!(!state.page_loaded(1, Vec::new()));
        state.begin_load();
        assert!(!state.page_loaded(2, Vec::new()));
        assert!(state.page_loaded(1, Vec::new()));
    }

    #[test]
    fn test_cancelled_load_can_restart() {
        let mut state = FeedState::default();
        assert!(!state.cancel_load());
        assert!(state.begin_load());
        assert!(state.cancel_load());
        assert!(!state.loading);
        // The abandoned page is refused; the next fetch asks for it again.
        assert!(!state.page_loaded(1, Vec::new()));
        assert!(state.begin_load());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_aggregated_reactions_follow_user_reaction() {
        let store: Store<SocialFeed> = Store::new();
        let mut rng = StdRng::seed_from_u64(3);
        load(&store, &mut rng);

        let before = store.view().aggregated_reactions.get(ReactionKind::Wow);
        assert!(store.dispatch(FeedAction::React {
            post_id: "1-2".into(),
            kind: ReactionKind::Wow,
        }));
        let view = store.view();
        let after = view.aggregated_reactions.get(ReactionKind::Wow);
        assert_eq!(after, before + 1);

        let wow = view
            .reaction_summary
            .iter()
            .find(|r| r.kind == ReactionKind::Wow)
            .unwrap();
        assert_eq!(wow.emoji, "😮");
        assert_eq!(wow.count, after);
        assert!(view.reaction_summary.iter().all(|r| r.count > 0));
    }
}
