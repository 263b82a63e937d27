//! Profile editor form.

use serde::Serialize;
use uuid::Uuid;

use agora_shared::constants::{LOCAL_USER_AVATAR, MAX_TEXT_CHARS};
use agora_shared::{can_submit, validate_text};

use crate::store::Widget;

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Where the avatar image comes from. A picked file is only ever a local
/// preview; nothing is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "kebab-case")]
pub enum Avatar {
    Default(String),
    LocalPreview(String),
}

impl Avatar {
    pub fn path(&self) -> &str {
        match self {
            Self::Default(path) | Self::LocalPreview(path) => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub name: String,
    pub bio: String,
    pub avatar: Avatar,
    pub interests: Vec<Interest>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            name: String::new(),
            bio: String::new(),
            avatar: Avatar::Default(LOCAL_USER_AVATAR.to_string()),
            interests: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProfileAction {
    SetName(String),
    SetBio(String),
    SelectAvatar { path: String },
    AddInterest(String),
    RemoveInterest { interest_id: String },
}

impl ProfileState {
    pub fn set_name(&mut self, name: String) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }

    pub fn set_bio(&mut self, bio: String) -> bool {
        if self.bio == bio {
            return false;
        }
        self.bio = bio;
        true
    }

    pub fn select_avatar(&mut self, path: String) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        self.avatar = Avatar::LocalPreview(path);
        true
    }

    pub fn add_interest(&mut self, name: &str) -> bool {
        let Ok(name) = validate_text(name, MAX_NAME_CHARS) else {
            return false;
        };
        self.interests.push(Interest {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        });
        true
    }

    pub fn remove_interest(&mut self, interest_id: &str) -> bool {
        let before = self.interests.len();
        self.interests.retain(|i| i.id != interest_id);
        self.interests.len() != before
    }

    /// A profile needs a name; the bio may be empty but not over-long.
    pub fn can_save(&self) -> bool {
        can_submit(&self.name, MAX_NAME_CHARS) && self.bio.chars().count() <= MAX_TEXT_CHARS
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: ProfileState,
    pub avatar_path: String,
    pub can_save: bool,
}

pub struct ProfileEditor;

impl Widget for ProfileEditor {
    const NAME: &'static str = "profile";

    type State = ProfileState;
    type Action = ProfileAction;
    type View = ProfileView;

    fn seed() -> ProfileState {
        ProfileState {
            name: "Tamanna".into(),
            bio: "I'm a software developer interested in UI/UX design and web technologies.".into(),
            interests: ["Technology", "Design", "Photography"]
                .into_iter()
                .enumerate()
                .map(|(i, name)| Interest {
                    id: (i + 1).to_string(),
                    name: name.to_string(),
                })
                .collect(),
            ..ProfileState::default()
        }
    }

    fn reduce(state: &mut ProfileState, action: ProfileAction) -> bool {
        match action {
            ProfileAction::SetName(name) => state.set_name(name),
            ProfileAction::SetBio(bio) => state.set_bio(bio),
            ProfileAction::SelectAvatar { path } => state.select_avatar(path),
            ProfileAction::AddInterest(name) => state.add_interest(&name),
            ProfileAction::RemoveInterest { interest_id } => state.remove_interest(&interest_id),
        }
    }

    fn project(state: &ProfileState) -> ProfileView {
        ProfileView {
            profile: state.clone(),
            avatar_path: state.avatar.path().to_string(),
            can_save: state.can_save(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_seed() {
        let view = Store::<ProfileEditor>::new().view();
        assert_eq!(view.profile.name, "Tamanna");
        assert_eq!(view.profile.interests.len(), 3);
        assert_eq!(view.avatar_path, "/self.png");
        assert!(view.can_save);
    }

    #[test]
    fn test_add_and_remove_interest() {
        let store: Store<ProfileEditor> = Store::new();
        assert!(store.dispatch(ProfileAction::AddInterest("  Hiking ".into())));
        assert!(!store.dispatch(ProfileAction::AddInterest("   ".into())));

        let state = store.snapshot();
        let hiking = state.interests.last().unwrap();
        assert_eq!(hiking.name, "Hiking");

        assert!(store.dispatch(ProfileAction::RemoveInterest {
            interest_id: hiking.id.clone(),
        }));
        assert!(!store.dispatch(ProfileAction::RemoveInterest {
            interest_id: hiking.id.clone(),
        }));
        assert_eq!(store.snapshot().interests.len(), 3);
    }

    #[test]
    fn test_avatar_is_local_preview() {
        let store: Store<ProfileEditor> = Store::new();
        assert!(store.dispatch(ProfileAction::SelectAvatar {
            path: "file:///tmp/me.png".into(),
        }));
        let state = store.snapshot();
        assert_eq!(state.avatar, Avatar::LocalPreview("file:///tmp/me.png".into()));

        let json = serde_json::to_value(&state.avatar).unwrap();
        assert_eq!(json["kind"], "local-preview");
    }

    #[test]
    fn test_blank_name_blocks_save() {
        let store: Store<ProfileEditor> = Store::new();
        store.dispatch(ProfileAction::SetName("  ".into()));
        assert!(!store.view().can_save);
        store.dispatch(ProfileAction::SetBio(String::new()));
        store.dispatch(ProfileAction::SetName("Sam".into()));
        assert!(store.view().can_save);
    }
}
