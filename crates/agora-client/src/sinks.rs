//! Where finished submissions go. There is no backend; these are the seams
//! one would plug into.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::info;

use agora_store::profile::ProfileState;

use crate::error::{ClientError, Result};

pub trait SubmissionSink: Send + Sync {
    fn submit_post(&self, content: &str) -> Result<()>;
    fn save_profile(&self, profile: &ProfileState) -> Result<()>;
}

/// Logs every submission and accepts it.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl SubmissionSink for LoggingSink {
    fn submit_post(&self, content: &str) -> Result<()> {
        info!(chars = content.chars().count(), "Post submitted");
        Ok(())
    }

    fn save_profile(&self, profile: &ProfileState) -> Result<()> {
        info!(
            name = %profile.name,
            interests = profile.interests.len(),
            "Profile saved"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Submission {
    Post { content: String },
    Profile { profile: ProfileState },
}

/// Keeps submissions in memory. Can be told to refuse everything.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<Submission>>,
    refuse: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            submissions: Mutex::default(),
            refuse: true,
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, submission: Submission) -> Result<()> {
        if self.refuse {
            return Err(ClientError::Sink("submissions are refused".to_string()));
        }
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(submission);
        Ok(())
    }
}

impl SubmissionSink for RecordingSink {
    fn submit_post(&self, content: &str) -> Result<()> {
        self.record(Submission::Post {
            content: content.to_string(),
        })
    }

    fn save_profile(&self, profile: &ProfileState) -> Result<()> {
        self.record(Submission::Profile {
            profile: profile.clone(),
        })
    }
}
