//! Message text hygiene for player input and AI output.

use crate::errors::domain::{DomainError, ValidationKind};

/// Longest message, in characters.
pub const MAX_TEXT_CHARS: usize = 280;
/// Longest display name, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 40;

/// Trim player text and enforce the length cap.
pub fn validate_player_text(raw: &str) -> Result<String, DomainError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyText,
            "Message text must not be blank",
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(DomainError::validation(
            ValidationKind::TextTooLong,
            format!("Message text has {chars} characters; at most {MAX_TEXT_CHARS} allowed"),
        ));
    }
    Ok(text.to_string())
}

pub fn validate_display_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidDisplayName,
            format!("Display name must be 1 to {MAX_DISPLAY_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Clean generated text: trim, drop wrapping quotes, cap the length.
///
/// Returns `None` when nothing usable is left.
pub fn clean_generated_text(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
        }
    }
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_TEXT_CHARS).collect())
}
