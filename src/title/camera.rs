//! Camera-default filename detection and title normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Lowercase prefixes of filenames cameras and phones assign by default.
///
/// Common prefixes (by no means a complete list):
/// - `_DSC` Sony a6000
/// - `_MG_`, `_XXX` Canon EOS
/// - `DJI_` DJI drones
/// - `DSC_`, `DSC`, `DSCF`, `DSCN` Sony, Nikon, Fuji
/// - `IMG_` nearly every vendor
/// - `IMGP` Pentax
/// - `SDC` Samsung
/// - `Screenshot`, `fullsizeoutput` macOS screenshots and Photos exports
const CAMERA_DEFAULT_PREFIXES: &[&str] = &[
    "_dsc",
    "_mg",
    "_xxx",
    "dji_",
    "dsc",
    "img_",
    "imgp",
    "sdc",
    "screenshot",
    "fullsizeoutput",
];

/// `Pxxxxxxx` names from Panasonic Lumix and Olympus Tough cameras.
static NUMBERED_P_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^p\d{7,8}").expect("camera filename pattern is a constant and must compile")
});

/// Returns true when `name` looks like a filename a camera assigned by default.
///
/// Such names carry no descriptive content. Matching is case-insensitive and
/// every pattern applies regardless of context.
pub fn is_camera_default_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    CAMERA_DEFAULT_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
        || NUMBERED_P_PATTERN.is_match(&lower)
}

/// Returns the candidate when it is usable as a title.
///
/// A candidate is usable when it is non-empty after trimming and is not a
/// camera-default filename.
pub fn usable_title(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|c| !c.trim().is_empty() && !is_camera_default_name(c))
}

/// Picks `candidate` as a title unless it is empty or a camera-default name.
///
/// The candidate is returned unchanged when usable; otherwise `fallback` is
/// returned. Callers must pass a non-empty fallback to get a non-empty title.
pub fn normalize_title(candidate: Option<&str>, fallback: &str) -> String {
    usable_title(candidate).unwrap_or(fallback).to_string()
}
