//! Start URL validation.

use log::warn;

const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a start URL given on the command line.
///
/// Adds an `https://` prefix when no scheme is present, then requires a
/// parseable http(s) URL with a host. Overlong or invalid URLs are logged and
/// rejected with `None`.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    if normalized.len() > MAX_URL_LENGTH {
        let preview: String = normalized.chars().take(50).collect();
        warn!(
            "Skipping start URL exceeding maximum length ({} > {}): {preview}...",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => match parsed.scheme() {
            "http" | "https" => Some(normalized),
            _ => {
                warn!("Skipping start URL with unsupported scheme: {url}");
                None
            }
        },
        Ok(_) => {
            warn!("Skipping start URL without a host: {url}");
            None
        }
        Err(e) => {
            warn!("Skipping invalid start URL {url}: {e}");
            None
        }
    }
}
