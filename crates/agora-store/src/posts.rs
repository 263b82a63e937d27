//! Post feed with like bursts.
//!
//! Every like adds a floating marker to the post. Markers are independent
//! records keyed by id; the client expires each one after its lifetime.

use std::sync::Arc;

use serde::Serialize;

use crate::store::{find_mut, Widget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub image: Option<String>,
    pub timestamp: String,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    pub trending: bool,
}

/// A short-lived floating emoji above a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeMarker {
    pub id: u64,
    pub post_id: String,
    pub emoji: String,
    /// Horizontal position, percent of the post width.
    pub x: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFeedState {
    pub posts: Vec<Arc<Post>>,
    pub markers: Vec<LikeMarker>,
}

#[derive(Debug, Clone)]
pub enum PostAction {
    Like { post_id: String, marker: LikeMarker },
    ExpireMarker { marker_id: u64 },
}

impl PostFeedState {
    /// Count a like and attach its marker. The marker's post id is taken
    /// from `post_id`.
    pub fn like(&mut self, post_id: &str, mut marker: LikeMarker) -> bool {
        if self.markers.iter().any(|m| m.id == marker.id) {
            return false;
        }
        let Some(post) = find_mut(&mut self.posts, |p| p.id == post_id) else {
            return false;
        };
        post.likes += 1;
        marker.post_id = post_id.to_string();
        self.markers.push(marker);
        true
    }

    pub fn expire_marker(&mut self, marker_id: u64) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != marker_id);
        self.markers.len() != before
    }

    pub fn markers_for<'a>(
        &'a self,
        post_id: &'a str,
    ) -> impl Iterator<Item = &'a LikeMarker> + 'a {
        self.markers.iter().filter(move |m| m.post_id == post_id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub post: Arc<Post>,
    pub markers: Vec<LikeMarker>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFeedView {
    pub cards: Vec<PostCard>,
    pub trending: Vec<String>,
}

pub struct PostFeed;

impl Widget for PostFeed {
    const NAME: &'static str = "posts";

    type State = PostFeedState;
    type Action = PostAction;
    type View = PostFeedView;

    fn seed() -> PostFeedState {
        let post = |id: &str,
                    author: &str,
                    avatar: &str,
                    content: &str,
                    image: Option<&str>,
                    timestamp: &str,
                    (likes, comments, shares): (u32, u32, u32),
                    trending: bool| {
            Arc::new(Post {
                id: id.to_string(),
                author: author.to_string(),
                avatar: avatar.to_string(),
                content: content.to_string(),
                image: image.map(str::to_string),
                timestamp: timestamp.to_string(),
                likes,
                comments,
                shares,
                trending,
            })
        };

        PostFeedState {
            posts: vec![
                post(
                    "1",
                    "Alex Johnson",
                    "/q10.png",
                    "Just made it to my dream internship.",
                    Some("/p1.jpg"),
                    "2 hours ago",
                    (124, 18, 5),
                    true,
                ),
                post(
                    "2",
                    "Jamie Smith",
                    "/q11.png",
                    "Beautiful sunset at the beach today. Nature is truly amazing!",
                    Some("/p2.webp"),
                    "4 hours ago",
                    (89, 7, 2),
                    true,
                ),
                post(
                    "3",
                    "Taylor Brown",
                    "/q12.png",
                    "Just finished reading this amazing book. Highly recommend it to everyone interested in AI and its future implications.",
                    None,
                    "6 hours ago",
                    (45, 12, 3),
                    false,
                ),
            ],
            markers: Vec::new(),
        }
    }

    fn reduce(state: &mut PostFeedState, action: PostAction) -> bool {
        match action {
            PostAction::Like { post_id, marker } => state.like(&post_id, marker),
            PostAction::ExpireMarker { marker_id } => state.expire_marker(marker_id),
        }
    }

    fn project(state: &PostFeedState) -> PostFeedView {
        PostFeedView {
            cards: state
                .posts
                .iter()
                .map(|post| PostCard {
                    post: Arc::clone(post),
                    markers: state.markers_for(&post.id).cloned().collect(),
                })
                .collect(),
            trending: state
                .posts
                .iter()
                .filter(|p| p.trending)
                .map(|p| p.id.clone())
                .collect(),
        }
    }
}
