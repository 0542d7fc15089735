//! Title derivation for galleries and images.
//!
//! Gallery pages rarely carry clean titles: alt text is missing or is just the
//! filename the camera picked. This module turns whatever is available into a
//! readable title:
//! - Camera-default filename detection and normalization
//! - Titles built from URL path segments
//! - Ordered fallback chains over several candidate sources

mod camera;
mod fallback;
mod url;

pub use camera::{is_camera_default_name, normalize_title, usable_title};
pub use fallback::TitleFallback;
pub use url::title_from_url;

pub(crate) use url::{split_extension, url_path};
