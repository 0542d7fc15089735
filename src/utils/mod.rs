//! Shared helpers: selector parsing and error message sanitizing.

pub mod sanitize;
mod selector;

pub use sanitize::sanitize_and_truncate_error_message;
pub use selector::parse_selector_with_fallback;
