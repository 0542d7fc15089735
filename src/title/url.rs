//! Title construction from URLs.

use std::borrow::Cow;

use ::url::Url;

/// Returns the path portion of a URL without query or fragment.
///
/// Absolute URLs are parsed and keep only their path, so a bare authority
/// (`https://example.org`) yields `/`. Input that does not parse as an
/// absolute URL is treated as a relative path.
pub(crate) fn url_path(url: &str) -> Cow<'_, str> {
    match Url::parse(url) {
        Ok(parsed) => Cow::Owned(parsed.path().to_string()),
        Err(_) => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            Cow::Borrowed(&url[..end])
        }
    }
}

/// Splits a filename into stem and extension at its last dot.
///
/// Leading dots do not start an extension, so `.htaccess` has none.
pub(crate) fn split_extension(segment: &str) -> (&str, &str) {
    let leading_dots = segment.len() - segment.trim_start_matches('.').len();
    match segment[leading_dots..].rfind('.') {
        Some(idx) => segment.split_at(leading_dots + idx),
        None => (segment, ""),
    }
}

/// Upper-cases every letter that does not follow another letter and
/// lower-cases the rest, leaving all other characters untouched.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

/// Builds a human-readable title from the last path segment of a URL.
///
/// The query string, fragment and trailing slashes are removed, the file
/// extension is dropped, underscores and hyphens become spaces, percent-escapes
/// are decoded, and the result is trimmed and title-cased. Returns an empty
/// string when the URL has no path segments.
///
/// # Examples
///
/// ```
/// use retrogallery::title::title_from_url;
///
/// assert_eq!(
///     title_from_url("https://oldcrap.org/2018/02/21/texas-instruments-ti-99-4a/"),
///     "Texas Instruments Ti 99 4A"
/// );
/// ```
pub fn title_from_url(url: &str) -> String {
    let path = url_path(url);
    let path = path.trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or_default();
    let (stem, _extension) = split_extension(segment);
    let spaced = stem.replace(['_', '-'], " ");
    let decoded = match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes()))
            .into_owned(),
    };
    title_case(decoded.trim())
}
