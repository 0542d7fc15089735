//! CSS selector parsing.

use scraper::Selector;

/// Parses a CSS selector, falling back to one that matches nothing.
///
/// A parse failure is logged with `context` and the crawl continues with an
/// empty selection, so a bad site rule yields no galleries instead of a panic.
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse CSS selector '{}' in {}: {}. Using fallback selector.",
            selector_str,
            context,
            e
        );
        Selector::parse("*:not(*)")
            .expect("Fallback selector '*:not(*)' should always parse - this is a programming error")
    })
}
