//! # agora-shared
//!
//! Value types, constants, errors and input validation shared by the widget
//! stores and the client runtime.

pub mod constants;
pub mod error;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use types::*;
pub use validation::{can_submit, chars_remaining, validate_text};
