//! File extension extraction from image URLs.

use crate::title::{split_extension, url_path};

/// Extracts the file extension (including the leading `.`) from a URL.
///
/// The query string and fragment are ignored, so
/// `…/photo.jpeg?resize=150%2C150&ssl=1` yields `.jpeg`. Returns an empty
/// string when the last path segment has no extension or the URL is too
/// malformed to have a path; this never fails.
pub fn extract_extension(url: &str) -> String {
    let path = url_path(url);
    let segment = path.rsplit('/').next().unwrap_or_default();
    let (_stem, extension) = split_extension(segment);
    extension.to_string()
}
