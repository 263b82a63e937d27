//! Submit paths for the micro-post composer and the profile editor.

use std::sync::Arc;

use tracing::{info, warn};

use agora_shared::constants::{MAX_POST_CHARS, MAX_TEXT_CHARS};
use agora_shared::{validate_text, ValidationError};
use agora_store::micro_post::{MicroPost, MicroPostAction};
use agora_store::profile::{ProfileEditor, MAX_NAME_CHARS};
use agora_store::Store;

use crate::error::Result;
use crate::sinks::SubmissionSink;

pub struct MicroPostComposer {
    store: Store<MicroPost>,
    sink: Arc<dyn SubmissionSink>,
}

impl MicroPostComposer {
    pub fn new(store: Store<MicroPost>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &Store<MicroPost> {
        &self.store
    }

    /// Hand the current draft to the sink and reset the composer. Returns the
    /// submitted text. The draft is kept when the sink refuses it.
    pub fn submit(&self) -> Result<String> {
        let draft = self.store.snapshot();
        let content = validate_text(&draft.content, MAX_POST_CHARS)?;

        if let Err(e) = self.sink.submit_post(content) {
            warn!(error = %e, "Post submission failed");
            return Err(e);
        }
        self.store.dispatch(MicroPostAction::Clear);
        info!(widget = "micro_post", "Draft submitted");
        Ok(content.to_string())
    }
}

pub struct ProfileComposer {
    store: Store<ProfileEditor>,
    sink: Arc<dyn SubmissionSink>,
}

impl ProfileComposer {
    pub fn new(store: Store<ProfileEditor>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &Store<ProfileEditor> {
        &self.store
    }

    pub fn save(&self) -> Result<()> {
        let profile = self.store.snapshot();
        validate_text(&profile.name, MAX_NAME_CHARS)?;
        let bio_chars = profile.bio.chars().count();
        if bio_chars > MAX_TEXT_CHARS {
            return Err(ValidationError::TooLong {
                max: MAX_TEXT_CHARS,
                actual: bio_chars,
            }
            .into());
        }

        self.sink.save_profile(&profile)?;
        info!(widget = "profile", "Profile handed to sink");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::sinks::{RecordingSink, Submission};
    use agora_store::profile::ProfileAction;

    fn composer(sink: &Arc<RecordingSink>) -> MicroPostComposer {
        MicroPostComposer::new(Store::new(), Arc::clone(sink) as Arc<dyn SubmissionSink>)
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let sink = Arc::new(RecordingSink::new());
        let composer = composer(&sink);
        composer
            .store()
            .dispatch(MicroPostAction::Edit("  first post \n".into()));

        assert_eq!(composer.submit().unwrap(), "first post");
        assert_eq!(
            sink.submissions(),
            [Submission::Post {
                content: "first post".into()
            }]
        );
        assert_eq!(composer.store().snapshot().content, "");
    }

    #[test]
    fn test_over_limit_is_rejected_locally() {
        let sink = Arc::new(RecordingSink::new());
        let composer = composer(&sink);
        composer
            .store()
            .dispatch(MicroPostAction::Edit("a".repeat(281)));

        let err = composer.submit().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::TooLong { max: 280, actual: 281 })
        ));
        assert!(sink.submissions().is_empty());
        assert_eq!(composer.store().snapshot().content.len(), 281);
    }

    #[test]
    fn test_refused_submission_keeps_draft() {
        let sink = Arc::new(RecordingSink::refusing());
        let composer = composer(&sink);
        composer.store().dispatch(MicroPostAction::Edit("hi".into()));

        assert!(matches!(composer.submit(), Err(ClientError::Sink(_))));
        assert_eq!(composer.store().snapshot().content, "hi");
    }

    #[test]
    fn test_profile_save() {
        let sink = Arc::new(RecordingSink::new());
        let profile =
            ProfileComposer::new(Store::new(), Arc::clone(&sink) as Arc<dyn SubmissionSink>);
        profile.save().unwrap();

        profile.store().dispatch(ProfileAction::SetName(String::new()));
        assert!(matches!(
            profile.save(),
            Err(ClientError::Validation(ValidationError::Empty))
        ));

        let saved = sink.submissions();
        assert_eq!(saved.len(), 1);
        match &saved[0] {
            Submission::Profile { profile } => assert_eq!(profile.name, "Tamanna"),
            other => panic!("unexpected submission: {other:?}"),
        }
    }
}
