use thiserror::Error;

use agora_shared::ValidationError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Submission failed: {0}")]
    Sink(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No async runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
