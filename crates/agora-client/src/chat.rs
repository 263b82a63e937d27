//! Async side of the group chat: the local typing debounce and scripted
//! replies from remote users who are shown as typing.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info};

use agora_shared::constants::{MAX_TEXT_CHARS, SCRIPTED_REPLY};
use agora_shared::validate_text;
use agora_store::chat::{ChatAction, GroupChat, LOCAL_CHAT_USER_ID};
use agora_store::{Store, Subscription};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::timers::Timers;

pub struct ChatController {
    store: Store<GroupChat>,
    typing: Timers<()>,
    replies: Timers<String>,
    typing_clear_delay: Duration,
    subscription: Mutex<Option<Subscription>>,
}

impl ChatController {
    pub fn new(store: Store<GroupChat>, config: &ClientConfig, runtime: Handle) -> Self {
        let typing = Timers::new(runtime.clone());
        let replies: Timers<String> = Timers::new(runtime);
        let reply_delay = config.remote_reply_delay;

        let subscription = {
            let store_for_replies = store.clone();
            let replies = replies.clone();
            store.subscribe(move |_| {
                reconcile_replies(&store_for_replies, &replies, reply_delay);
            })
        };
        reconcile_replies(&store, &replies, reply_delay);

        info!(widget = "chat", "Chat controller mounted");
        Self {
            store,
            typing,
            replies,
            typing_clear_delay: config.typing_clear_delay,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    pub fn store(&self) -> &Store<GroupChat> {
        &self.store
    }

    /// The local user typed a character: show them as typing and push the
    /// clear back by the full delay.
    pub fn keystroke(&self) {
        self.store.dispatch(ChatAction::SetTyping {
            user_id: LOCAL_CHAT_USER_ID.to_string(),
            typing: true,
        });

        let store = self.store.clone();
        self.typing.schedule((), self.typing_clear_delay, move || {
            store.dispatch(ChatAction::SetTyping {
                user_id: LOCAL_CHAT_USER_ID.to_string(),
                typing: false,
            });
        });
    }

    /// Send a message as the local user.
    pub fn send(&self, content: &str) -> Result<()> {
        let content = validate_text(content, MAX_TEXT_CHARS)?;
        self.store.dispatch(ChatAction::Send {
            content: content.to_string(),
        });
        self.typing.cancel(&());
        Ok(())
    }

    /// Mark a remote user as typing. Their scripted reply follows after the
    /// configured delay.
    pub fn remote_started_typing(&self, user_id: &str) -> bool {
        self.store.dispatch(ChatAction::SetTyping {
            user_id: user_id.to_string(),
            typing: true,
        })
    }

    /// Remote users with a reply on the way.
    pub fn pending_replies(&self) -> usize {
        self.replies.pending_count()
    }

    pub fn is_local_typing_pending(&self) -> bool {
        self.typing.is_pending(&())
    }

    /// Detach from the store and cancel every pending timer.
    pub fn unmount(&self) {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.typing.cancel_all();
        self.replies.cancel_all();
        info!(widget = "chat", "Chat controller unmounted");
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.typing.cancel_all();
        self.replies.cancel_all();
    }
}

/// Keep exactly one pending reply per typing remote user. Reads the current
/// state rather than the notified one, which may already be outdated.
fn reconcile_replies(store: &Store<GroupChat>, replies: &Timers<String>, delay: Duration) {
    let state = store.snapshot();
    let typing: HashSet<&str> = state
        .typing_remote_users()
        .map(|u| u.id.as_str())
        .collect();

    for user_id in replies.pending_keys() {
        if !typing.contains(user_id.as_str()) {
            replies.cancel(&user_id);
        }
    }

    for user_id in typing {
        let store = store.clone();
        let reply_to = user_id.to_string();
        let armed = replies.schedule_if_idle(user_id.to_string(), delay, move || {
            store.dispatch(ChatAction::Receive {
                user_id: reply_to,
                content: SCRIPTED_REPLY.to_string(),
            });
        });
        if armed {
            debug!(user_id, "Scheduled remote reply");
        }
    }
}
