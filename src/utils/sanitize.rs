//! Error message sanitizing before messages are logged or stored.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Removes control characters.
///
/// Tabs and line breaks become a single space so the words around them stay
/// apart; every other control character is dropped.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = String::with_capacity(message.len());
    for c in message.chars() {
        if matches!(c, '\t' | '\n' | '\r') {
            if !sanitized.ends_with(' ') {
                sanitized.push(' ');
            }
        } else if !c.is_control() {
            sanitized.push(c);
        }
    }
    sanitized.trim().to_string()
}

/// Sanitizes a message and truncates it to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// A truncated message ends with a marker giving the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let length = sanitized.chars().count();

    if length <= MAX_ERROR_MESSAGE_LENGTH {
        return sanitized;
    }

    let kept: String = sanitized
        .chars()
        .take(MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50))
        .collect();
    format!("{kept}... (truncated, original length: {length} chars)")
}
