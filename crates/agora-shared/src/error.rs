use thiserror::Error;

/// Why a piece of user-entered text was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text is empty")]
    Empty,

    #[error("Text is too long: {actual} characters (max {max})")]
    TooLong { max: usize, actual: usize },
}
