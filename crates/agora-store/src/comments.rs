//! Comment thread with one level of replies and per-entry likes.

use std::sync::Arc;

use serde::Serialize;

use agora_shared::constants::{LOCAL_USER_AVATAR, LOCAL_USER_NAME, MAX_TEXT_CHARS};
use agora_shared::validate_text;

use crate::reactions::toggle_like;
use crate::store::{find_mut, Widget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
    pub liked: bool,
    pub replies: Vec<Arc<Reply>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedState {
    /// Newest first.
    pub comments: Vec<Arc<Comment>>,
    /// Comment whose reply box is open.
    pub replying_to: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CommentAction {
    /// Like or unlike a comment, or one of its replies.
    ToggleLike {
        comment_id: String,
        reply_id: Option<String>,
    },
    AddComment {
        content: String,
    },
    AddReply {
        comment_id: String,
        content: String,
    },
    /// Open the reply box under a comment, or close it if already open.
    ToggleReplyBox {
        comment_id: String,
    },
}

impl CommentFeedState {
    pub fn toggle_like(&mut self, comment_id: &str, reply_id: Option<&str>) -> bool {
        let Some(comment) = find_mut(&mut self.comments, |c| c.id == comment_id) else {
            return false;
        };

        match reply_id {
            None => toggle_like(&mut comment.likes, &mut comment.liked),
            Some(reply_id) => {
                let Some(reply) = find_mut(&mut comment.replies, |r| r.id == reply_id) else {
                    return false;
                };
                toggle_like(&mut reply.likes, &mut reply.liked);
            }
        }
        true
    }

    pub fn add_comment(&mut self, content: &str) -> bool {
        let Ok(content) = validate_text(content, MAX_TEXT_CHARS) else {
            return false;
        };

        // Comments are never removed, so the count stays a unique id.
        let comment = Comment {
            id: (self.comments.len() + 1).to_string(),
            author: LOCAL_USER_NAME.to_string(),
            avatar: LOCAL_USER_AVATAR.to_string(),
            content: content.to_string(),
            timestamp: "Just now".to_string(),
            likes: 0,
            liked: false,
            replies: Vec::new(),
        };
        self.comments.insert(0, Arc::new(comment));
        true
    }

    pub fn add_reply(&mut self, comment_id: &str, content: &str) -> bool {
        let Ok(content) = validate_text(content, MAX_TEXT_CHARS) else {
            return false;
        };
        let Some(comment) = find_mut(&mut self.comments, |c| c.id == comment_id) else {
            return false;
        };

        let reply = Reply {
            id: format!("{}-{}", comment.id, comment.replies.len() + 1),
            author: LOCAL_USER_NAME.to_string(),
            avatar: LOCAL_USER_AVATAR.to_string(),
            content: content.to_string(),
            timestamp: "Just now".to_string(),
            likes: 0,
            liked: false,
        };
        comment.replies.push(Arc::new(reply));
        self.replying_to = None;
        true
    }

    pub fn toggle_reply_box(&mut self, comment_id: &str) -> bool {
        if !self.comments.iter().any(|c| c.id == comment_id) {
            return false;
        }
        self.replying_to = match self.replying_to.as_deref() {
            Some(open) if open == comment_id => None,
            _ => Some(comment_id.to_string()),
        };
        true
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments
            .iter()
            .find(|c| c.id == comment_id)
            .map(|c| c.as_ref())
    }
}

/// Render model of the comment feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedView {
    pub comments: Vec<Arc<Comment>>,
    pub replying_to: Option<String>,
    pub total_comments: usize,
    pub total_replies: usize,
}

pub struct CommentFeed;

impl Widget for CommentFeed {
    const NAME: &'static str = "comments";

    type State = CommentFeedState;
    type Action = CommentAction;
    type View = CommentFeedView;

    fn seed() -> CommentFeedState {
        let reply = Reply {
            id: "1-1".to_string(),
            author: "Sam Taylor".to_string(),
            avatar: "/q2.png".to_string(),
            content: "I agree! It's been a game-changer.".to_string(),
            timestamp: "1 hour ago".to_string(),
            likes: 3,
            liked: false,
        };

        CommentFeedState {
            comments: vec![
                Arc::new(Comment {
                    id: "1".to_string(),
                    author: "Alex Johnson".to_string(),
                    avatar: "/q1.png".to_string(),
                    content: "This new event is amazing! I've been waiting for something like this."
                        .to_string(),
                    timestamp: "2 hours ago".to_string(),
                    likes: 12,
                    liked: false,
                    replies: vec![Arc::new(reply)],
                }),
                Arc::new(Comment {
                    id: "2".to_string(),
                    author: "Jamie Smith".to_string(),
                    avatar: "/q3.png".to_string(),
                    content: "Nice event yeah.".to_string(),
                    timestamp: "3 hours ago".to_string(),
                    likes: 5,
                    liked: false,
                    replies: Vec::new(),
                }),
            ],
            replying_to: None,
        }
    }

    fn reduce(state: &mut CommentFeedState, action: CommentAction) -> bool {
        match action {
            CommentAction::ToggleLike {
                comment_id,
                reply_id,
            } => state.toggle_like(&comment_id, reply_id.as_deref()),
            CommentAction::AddComment { content } => state.add_comment(&content),
            CommentAction::AddReply {
                comment_id,
                content,
            } => state.add_reply(&comment_id, &content),
            CommentAction::ToggleReplyBox { comment_id } => state.toggle_reply_box(&comment_id),
        }
    }

    fn project(state: &CommentFeedState) -> CommentFeedView {
        CommentFeedView {
            comments: state.comments.clone(),
            replying_to: state.replying_to.clone(),
            total_comments: state.comments.len(),
            total_replies: state.comments.iter().map(|c| c.replies.len()).sum(),
        }
    }
}
