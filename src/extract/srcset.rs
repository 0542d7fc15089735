//! Responsive-image `srcset` parsing.

/// Splits a `srcset` attribute value into its candidate URLs.
///
/// Follows the candidate splitting rules browsers use: a URL runs until
/// whitespace, trailing commas on the URL end the candidate, and any
/// descriptors (`800w`, `2x`) are skipped up to the next comma. Commas inside
/// a URL (for example in `data:` URIs) are kept. URLs are returned unresolved.
pub fn parse_srcset(srcset: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let raw_url = &rest[..url_end];
        rest = &rest[url_end..];

        let url = raw_url.trim_end_matches(',');
        if url.len() == raw_url.len() {
            // Descriptors follow; skip them up to the next candidate.
            rest = match rest.find(',') {
                Some(comma) => &rest[comma + 1..],
                None => "",
            };
        }

        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }

    urls
}
