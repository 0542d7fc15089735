//! Content-addressed storage path construction.

use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::config::MAX_PATH_COMPONENT_BYTES;
use crate::extract::extract_extension;

/// Why a storage path could not be built for one image URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Missing gallery title")]
    MissingGalleryTitle,

    #[error("Missing image title")]
    MissingImageTitle,
}

/// Makes a title safe to use as a single path component.
///
/// Path separators become `_`, control characters are removed, surrounding
/// whitespace is trimmed, and a component made only of dots is replaced so it
/// cannot climb out of its directory. Long titles are cut at a character
/// boundary to at most `MAX_PATH_COMPONENT_BYTES` bytes.
pub fn escape_path_component(title: &str) -> String {
    let escaped: String = title
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let escaped = truncate_to_bytes(escaped.trim(), MAX_PATH_COMPONENT_BYTES).trim_end();

    if !escaped.is_empty() && escaped.chars().all(|c| c == '.') {
        escaped.replace('.', "_")
    } else {
        escaped.to_string()
    }
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character.
fn truncate_to_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Builds the storage path of one image URL.
///
/// The layout is `source/gallery title/image title/<sha1 of url><extension>`,
/// with `/` as the separator on every platform. Titles are escaped; the hash
/// is the hex SHA-1 of the URL text, so the same inputs always produce the
/// same path.
///
/// # Errors
///
/// Returns a `PathError` when the gallery or image title is empty after
/// trimming; the caller skips that URL.
pub fn build_storage_path(
    source_name: &str,
    gallery_title: &str,
    image_title: &str,
    url: &str,
) -> Result<String, PathError> {
    let gallery = escape_path_component(gallery_title);
    if gallery.is_empty() {
        return Err(PathError::MissingGalleryTitle);
    }
    let image = escape_path_component(image_title);
    if image.is_empty() {
        return Err(PathError::MissingImageTitle);
    }

    let digest = hex::encode(Sha1::digest(url.as_bytes()));
    let extension = escape_path_component(&extract_extension(url));

    Ok(format!(
        "{}/{}/{}/{}{}",
        escape_path_component(source_name),
        gallery,
        image,
        digest,
        extension
    ))
}
