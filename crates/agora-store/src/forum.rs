//! Forum thread viewer: reactions, tag filter and sort order.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use agora_shared::{ForumSort, ReactionKind};

use crate::reactions::{ReactionCounts, Reactions};
use crate::store::{find_mut, Widget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub reactions: Reactions,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumState {
    /// Oldest first.
    pub posts: Vec<Arc<ForumPost>>,
    pub active_tag: Option<String>,
    pub sort_by: ForumSort,
}

#[derive(Debug, Clone)]
pub enum ForumAction {
    React { post_id: String, kind: ReactionKind },
    FilterTag(Option<String>),
    SortBy(ForumSort),
}

impl ForumState {
    pub fn react(&mut self, post_id: &str, kind: ReactionKind) -> bool {
        match find_mut(&mut self.posts, |p| p.id == post_id) {
            Some(post) => {
                post.reactions.set_reaction(kind);
                true
            }
            None => false,
        }
    }

    pub fn filter_tag(&mut self, tag: Option<String>) -> bool {
        if self.active_tag == tag {
            return false;
        }
        self.active_tag = tag;
        true
    }

    pub fn sort_by(&mut self, sort: ForumSort) -> bool {
        if self.sort_by == sort {
            return false;
        }
        self.sort_by = sort;
        true
    }
}

/// Every tag used in the thread, sorted and de-duplicated.
pub fn all_tags<'a, I>(tag_lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    tag_lists
        .into_iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumView {
    pub tags: Vec<String>,
    pub active_tag: Option<String>,
    pub sort_by: ForumSort,
    pub posts: Vec<Arc<ForumPost>>,
}

pub struct ForumThread;

impl Widget for ForumThread {
    const NAME: &'static str = "forum";

    type State = ForumState;
    type Action = ForumAction;
    type View = ForumView;

    fn seed() -> ForumState {
        let post = |id: &str,
                    author: &str,
                    avatar: &str,
                    content: &str,
                    timestamp: &str,
                    counts: [u32; 6],
                    tags: &[&str]| {
            Arc::new(ForumPost {
                id: id.to_string(),
                author: author.to_string(),
                avatar: avatar.to_string(),
                content: content.to_string(),
                timestamp: timestamp.to_string(),
                reactions: Reactions::new(ReactionCounts::from_pairs(
                    ReactionKind::ALL.into_iter().zip(counts),
                )),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
        };

        ForumState {
            posts: vec![
                post(
                    "1",
                    "Alex Johnson",
                    "/q6.png",
                    "Just discovered a great new featured event in the latest update!",
                    "2 hours ago",
                    [12, 5, 0, 2, 0, 0],
                    &["feature", "update", "event"],
                ),
                post(
                    "2",
                    "Jamie Smith",
                    "/q10.png",
                    "Yes! The new featured event is amazing. I especially like how they visualize user engagement over time.",
                    "1 hour ago",
                    [8, 3, 1, 0, 0, 0],
                    &["analytics", "visualization"],
                ),
                post(
                    "3",
                    "Taylor Brown",
                    "/q7.png",
                    "I'm soooo excited",
                    "45 minutes ago",
                    [2, 0, 0, 0, 3, 1],
                    &["excited"],
                ),
            ],
            active_tag: None,
            sort_by: ForumSort::Newest,
        }
    }

    fn reduce(state: &mut ForumState, action: ForumAction) -> bool {
        match action {
            ForumAction::React { post_id, kind } => state.react(&post_id, kind),
            ForumAction::FilterTag(tag) => state.filter_tag(tag),
            ForumAction::SortBy(sort) => state.sort_by(sort),
        }
    }

    fn project(state: &ForumState) -> ForumView {
        let mut posts: Vec<Arc<ForumPost>> = state
            .posts
            .iter()
            .filter(|p| match &state.active_tag {
                Some(tag) => p.tags.contains(tag),
                None => true,
            })
            .cloned()
            .collect();

        match state.sort_by {
            ForumSort::Newest => posts.reverse(),
            ForumSort::Oldest => {}
            // Stable: ties keep thread order.
            ForumSort::Popular => posts.sort_by_key(|p| Reverse(p.reactions.total())),
        }

        ForumView {
            tags: all_tags(state.posts.iter().map(|p| p.tags.as_slice())),
            active_tag: state.active_tag.clone(),
            sort_by: state.sort_by,
            posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn ids(view: &ForumView) -> Vec<&str> {
        view.posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_react_toggle_and_switch() {
        let store: Store<ForumThread> = Store::new();
        let react = |kind| ForumAction::React {
            post_id: "1".into(),
            kind,
        };

        store.dispatch(react(ReactionKind::Like));
        let post = store.snapshot().posts[0].clone();
        assert_eq!(post.reactions.counts.get(ReactionKind::Like), 13);
        assert_eq!(post.reactions.user_reaction, Some(ReactionKind::Like));

        store.dispatch(react(ReactionKind::Wow));
        let post = store.snapshot().posts[0].clone();
        assert_eq!(post.reactions.counts.get(ReactionKind::Like), 12);
        assert_eq!(post.reactions.counts.get(ReactionKind::Wow), 3);

        store.dispatch(react(ReactionKind::Wow));
        let post = store.snapshot().posts[0].clone();
        assert_eq!(post.reactions.total(), 19);
        assert_eq!(post.reactions.user_reaction, None);
    }

    #[test]
    fn test_tags_sorted_unique() {
        let view = Store::<ForumThread>::new().view();
        assert_eq!(
            view.tags,
            ["analytics", "event", "excited", "feature", "update", "visualization"]
        );
    }

    #[test]
    fn test_filter_and_sort() {
        let store: Store<ForumThread> = Store::new();
        assert_eq!(ids(&store.view()), ["3", "2", "1"]);

        store.dispatch(ForumAction::SortBy(ForumSort::Oldest));
        assert_eq!(ids(&store.view()), ["1", "2", "3"]);

        store.dispatch(ForumAction::SortBy(ForumSort::Popular));
        // 19, 12, 6 reactions
        assert_eq!(ids(&store.view()), ["1", "2", "3"]);

        store.dispatch(ForumAction::FilterTag(Some("excited".into())));
        assert_eq!(ids(&store.view()), ["3"]);

        assert!(!store.dispatch(ForumAction::FilterTag(Some("excited".into()))));
        store.dispatch(ForumAction::FilterTag(None));
        assert_eq!(store.view().posts.len(), 3);
    }

    #[test]
    fn test_unknown_post_is_ignored() {
        let store: Store<ForumThread> = Store::new();
        assert!(!store.dispatch(ForumAction::React {
            post_id: "42".into(),
            kind: ReactionKind::Sad,
        }));
    }
}
