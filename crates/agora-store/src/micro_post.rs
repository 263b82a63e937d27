//! Micro-post composer with a live character counter.

use serde::Serialize;

use agora_shared::constants::MAX_POST_CHARS;
use agora_shared::{can_submit, chars_remaining};

use crate::store::Widget;

/// Counter turns red below this many characters left.
pub const LOW_CHARS_WARNING: i64 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroPostState {
    pub content: String,
    pub preview: bool,
}

#[derive(Debug, Clone)]
pub enum MicroPostAction {
    Edit(String),
    TogglePreview,
    Clear,
}

impl MicroPostState {
    pub fn edit(&mut self, content: String) -> bool {
        if self.preview || self.content == content {
            return false;
        }
        self.content = content;
        true
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview = !self.preview;
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.content.is_empty() && !self.preview {
            return false;
        }
        *self = Self::default();
        true
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroPostView {
    pub content: String,
    pub preview: bool,
    /// May be negative once the post is over the limit.
    pub chars_remaining: i64,
    pub low_chars: bool,
    pub can_submit: bool,
}

pub struct MicroPost;

impl Widget for MicroPost {
    const NAME: &'static str = "micro_post";

    type State = MicroPostState;
    type Action = MicroPostAction;
    type View = MicroPostView;

    fn seed() -> MicroPostState {
        MicroPostState::default()
    }

    fn reduce(state: &mut MicroPostState, action: MicroPostAction) -> bool {
        match action {
            MicroPostAction::Edit(content) => state.edit(content),
            MicroPostAction::TogglePreview => state.toggle_preview(),
            MicroPostAction::Clear => state.clear(),
        }
    }

    fn project(state: &MicroPostState) -> MicroPostView {
        let remaining = chars_remaining(&state.content, MAX_POST_CHARS);
        MicroPostView {
            content: state.content.clone(),
            preview: state.preview,
            chars_remaining: remaining,
            low_chars: remaining < LOW_CHARS_WARNING,
            can_submit: can_submit(&state.content, MAX_POST_CHARS),
        }
    }
}
