//! Group chat with typing indicators.
//!
//! Typing flags are plain state here. Expiring them (the local debounce and
//! the scripted remote replies) is the client's job.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

use agora_shared::constants::{LOCAL_USER_AVATAR, LOCAL_USER_NAME, MAX_TEXT_CHARS};
use agora_shared::validate_text;

use crate::store::{find_mut, Widget};

/// User id of the local participant.
pub const LOCAL_CHAT_USER_ID: &str = "4";

const TIME_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_online: bool,
    pub is_typing: bool,
}

impl ChatUser {
    pub fn is_local(&self) -> bool {
        self.id == LOCAL_CHAT_USER_ID
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub messages: Vec<Arc<ChatMessage>>,
    pub users: Vec<Arc<ChatUser>>,
}

#[derive(Debug, Clone)]
pub enum ChatAction {
    SetTyping { user_id: String, typing: bool },
    /// Post a message as the local user.
    Send { content: String },
    /// Post a message on behalf of a remote user who is shown as typing.
    Receive { user_id: String, content: String },
}

fn now() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

impl ChatState {
    pub fn set_typing(&mut self, user_id: &str, typing: bool) -> bool {
        match find_mut(&mut self.users, |u| u.id == user_id && u.is_typing != typing) {
            Some(user) => {
                user.is_typing = typing;
                true
            }
            None => false,
        }
    }

    pub fn send(&mut self, content: &str) -> bool {
        let Ok(content) = validate_text(content, MAX_TEXT_CHARS) else {
            return false;
        };
        self.messages.push(Arc::new(ChatMessage {
            id: Uuid::new_v4().to_string(),
            author: LOCAL_USER_NAME.to_string(),
            avatar: LOCAL_USER_AVATAR.to_string(),
            content: content.to_string(),
            timestamp: now(),
            is_current_user: true,
        }));
        self.set_typing(LOCAL_CHAT_USER_ID, false);
        true
    }

    pub fn receive(&mut self, user_id: &str, content: &str) -> bool {
        let Ok(content) = validate_text(content, MAX_TEXT_CHARS) else {
            return false;
        };
        let Some(user) = self.user(user_id).filter(|u| !u.is_local() && u.is_typing) else {
            return false;
        };
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            author: user.name.clone(),
            avatar: user.avatar.clone(),
            content: content.to_string(),
            timestamp: now(),
            is_current_user: false,
        };
        self.messages.push(Arc::new(message));
        self.set_typing(user_id, false);
        true
    }

    pub fn user(&self, user_id: &str) -> Option<&Arc<ChatUser>> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Remote users whose typing flag is set.
    pub fn typing_remote_users(&self) -> impl Iterator<Item = &Arc<ChatUser>> {
        self.users.iter().filter(|u| u.is_typing && !u.is_local())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub messages: Vec<Arc<ChatMessage>>,
    pub users: Vec<Arc<ChatUser>>,
    /// Names shown in the "... is typing" line. Never includes the local user.
    pub typing: Vec<String>,
    pub online_count: usize,
}

pub struct GroupChat;

impl Widget for GroupChat {
    const NAME: &'static str = "chat";

    type State = ChatState;
    type Action = ChatAction;
    type View = ChatView;

    fn seed() -> ChatState {
        let message = |id: &str, author: &str, avatar: &str, content: &str, timestamp: &str| {
            Arc::new(ChatMessage {
                id: id.to_string(),
                author: author.to_string(),
                avatar: avatar.to_string(),
                content: content.to_string(),
                timestamp: timestamp.to_string(),
                is_current_user: author == LOCAL_USER_NAME,
            })
        };
        let user = |id: &str, name: &str, avatar: &str, is_online, is_typing| {
            Arc::new(ChatUser {
                id: id.to_string(),
                name: name.to_string(),
                avatar: avatar.to_string(),
                is_online,
                is_typing,
            })
        };

        ChatState {
            messages: vec![
                message(
                    "1",
                    "Alex Johnson",
                    "/q5.png",
                    "Hey everyone! How's it going?",
                    "10:32 AM",
                ),
                message("2", "Jamie Smith", "/q6.png", "Pretty good!", "10:33 AM"),
                message(
                    "3",
                    LOCAL_USER_NAME,
                    LOCAL_USER_AVATAR,
                    "I'm excited to see the new updates!",
                    "10:34 AM",
                ),
            ],
            users: vec![
                user("1", "Alex Johnson", "/q5.png", true, false),
                user("2", "Jamie Smith", "/q6.png", true, true),
                user("3", "Taylor Brown", "/q7.png", false, false),
                user(LOCAL_CHAT_USER_ID, LOCAL_USER_NAME, LOCAL_USER_AVATAR, true, false),
            ],
        }
    }

    fn reduce(state: &mut ChatState, action: ChatAction) -> bool {
        match action {
            ChatAction::SetTyping { user_id, typing } => state.set_typing(&user_id, typing),
            ChatAction::Send { content } => state.send(&content),
            ChatAction::Receive { user_id, content } => state.receive(&user_id, &content),
        }
    }

    fn project(state: &ChatState) -> ChatView {
        ChatView {
            messages: state.messages.clone(),
            users: state.users.clone(),
            typing: state.typing_remote_users().map(|u| u.name.clone()).collect(),
            online_count: state.users.iter().filter(|u| u.is_online).count(),
        }
    }
}
