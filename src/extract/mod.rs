//! Image URL and extension extraction.
//!
//! This module pulls candidate image URLs out of `<img>` elements, including
//! the size variants listed in responsive-image `srcset` attributes, and
//! derives file extensions from image URLs.

mod extension;
mod srcset;

use indexmap::IndexSet;
use scraper::ElementRef;

pub use extension::extract_extension;
pub use srcset::parse_srcset;

/// Which attributes of an image element carry its URLs.
///
/// Lazy-loading plugins move the real URLs into `data-*` attributes, so each
/// site names the attributes it trusts.
#[derive(Debug, Clone, Copy)]
pub struct ImageSources {
    /// Attributes holding a single URL each, in priority order
    pub primary: &'static [&'static str],
    /// Attributes holding a `srcset`-style list of size variants
    pub size_variants: &'static [&'static str],
}

impl Default for ImageSources {
    fn default() -> Self {
        Self {
            primary: &["src"],
            size_variants: &["srcset"],
        }
    }
}

fn is_candidate_url(url: &str) -> bool {
    !url.is_empty() && !url.starts_with("data:")
}

/// Extracts the candidate image URLs of a single element.
///
/// Primary attributes come first, then every URL listed in the size-variant
/// attributes. Duplicates are removed keeping the first occurrence; `data:`
/// placeholders are skipped. URLs are returned as written in the markup.
///
/// ```
/// use retrogallery::extract::{extract_image_urls, ImageSources};
/// use scraper::{Html, Selector};
///
/// let html = Html::parse_fragment(r#"<img src="a.jpg" srcset="a.jpg 1x, a-2x.jpg 2x">"#);
/// let img = html.select(&Selector::parse("img").unwrap()).next().unwrap();
/// assert_eq!(extract_image_urls(img, &ImageSources::default()), ["a.jpg", "a-2x.jpg"]);
/// ```
pub fn extract_image_urls(element: ElementRef<'_>, sources: &ImageSources) -> Vec<String> {
    collect_image_urls(std::iter::once(element), sources)
}

/// Extracts the candidate image URLs of several elements forming one image group.
pub fn collect_image_urls<'a>(
    elements: impl IntoIterator<Item = ElementRef<'a>>,
    sources: &ImageSources,
) -> Vec<String> {
    let mut urls: IndexSet<String> = IndexSet::new();

    for element in elements {
        let value = element.value();
        for attr in sources.primary {
            if let Some(url) = value.attr(attr).map(str::trim) {
                if is_candidate_url(url) {
                    urls.insert(url.to_string());
                }
            }
        }
        for attr in sources.size_variants {
            if let Some(srcset) = value.attr(attr) {
                urls.extend(
                    parse_srcset(srcset)
                        .into_iter()
                        .filter(|url| is_candidate_url(url)),
                );
            }
        }
    }

    urls.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_img(html: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("img").unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_src_and_srcset_deduplicated_in_order() {
        let html = Html::parse_fragment(r#"<img src="a.jpg" srcset="a.jpg 1x, a-2x.jpg 2x">"#);
        assert_eq!(
            extract_image_urls(first_img(&html), &ImageSources::default()),
            vec!["a.jpg", "a-2x.jpg"]
        );
    }

    #[test]
    fn test_src_only() {
        let html = Html::parse_fragment(r#"<img src=" /uploads/zx81.png " alt="ZX81">"#);
        assert_eq!(
            extract_image_urls(first_img(&html), &ImageSources::default()),
            vec!["/uploads/zx81.png"]
        );
    }

    #[test]
    fn test_no_sources() {
        let html = Html::parse_fragment(r#"<img alt="nothing here">"#);
        assert!(extract_image_urls(first_img(&html), &ImageSources::default()).is_empty());
    }

    #[test]
    fn test_data_placeholder_skipped() {
        let html = Html::parse_fragment(
            r#"<img src="https://i0.wp.com/x.jpeg?ssl=1" srcset="data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7">"#,
        );
        assert_eq!(
            extract_image_urls(first_img(&html), &ImageSources::default()),
            vec!["https://i0.wp.com/x.jpeg?ssl=1"]
        );
    }

    #[test]
    fn test_custom_sources() {
        let html = Html::parse_fragment(
            r#"<img src="small.jpg" data-orig-file="full.jpeg" data-lazy-srcset="full.jpeg 2000w, mid.jpeg 900w">"#,
        );
        let sources = ImageSources {
            primary: &["data-orig-file"],
            size_variants: &["data-lazy-srcset"],
        };
        assert_eq!(
            extract_image_urls(first_img(&html), &sources),
            vec!["full.jpeg", "mid.jpeg"]
        );
    }

    #[test]
    fn test_collect_across_elements() {
        let html = Html::parse_fragment(r#"<figure><img src="a.jpg"><img src="b.jpg"><img src="a.jpg"></figure>"#);
        let selector = Selector::parse("img").unwrap();
        assert_eq!(
            collect_image_urls(html.select(&selector), &ImageSources::default()),
            vec!["a.jpg", "b.jpg"]
        );
    }
}
