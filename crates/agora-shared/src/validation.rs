//! Input gating for every free-text entry point.
//!
//! A widget never raises on bad input: it asks [`validate_text`] and simply
//! ignores the action (the submit affordance stays disabled) when it fails.

use crate::error::ValidationError;

/// Check `input` against the length ceiling and return its trimmed form.
///
/// The ceiling applies to the raw input, counted in characters, so that the
/// "characters remaining" counter and the gate always agree.
pub fn validate_text(input: &str, max_chars: usize) -> Result<&str, ValidationError> {
    let actual = input.chars().count();
    if actual > max_chars {
        return Err(ValidationError::TooLong {
            max: max_chars,
            actual,
        });
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(trimmed)
}

/// Whether the submit affordance for `input` should be enabled.
pub fn can_submit(input: &str, max_chars: usize) -> bool {
    validate_text(input, max_chars).is_ok()
}

/// Characters left before `input` reaches `max_chars`. Negative when over.
pub fn chars_remaining(input: &str, max_chars: usize) -> i64 {
    max_chars as i64 - input.chars().count() as i64
}
