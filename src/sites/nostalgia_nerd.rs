//! www.nostalgianerd.com gallery rules.
//!
//! The index lists galleries as `<h3 class="preview-title"><a href title>`;
//! gallery pages are WordPress posts with the photos inside
//! `div.entry-content`, either as `<p><a><img></a></p>` or `<figure><img>`.

use std::sync::LazyLock;

use log::debug;
use scraper::Selector;

use crate::extract::{extract_image_urls, ImageSources};
use crate::item::{GalleryRef, PendingImage};
use crate::title::{title_from_url, TitleFallback};
use crate::utils::parse_selector_with_fallback;

use super::{element_text, heading_context, GallerySite, Page};

const NAME: &str = "nostalgianerd";
const START_URL: &str = "https://www.nostalgianerd.com/category/gallery";
const ALLOWED_DOMAINS: &[&str] = &["nostalgianerd.com"];

static PREVIEW_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("h3.preview-title a", "nostalgianerd gallery links")
});
static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("div.entry-content", "nostalgianerd content")
});
static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("p a img, figure img", "nostalgianerd images")
});

pub struct NostalgiaNerd {
    start_urls: Vec<String>,
}

impl NostalgiaNerd {
    pub fn new() -> Self {
        Self::with_start_urls(vec![START_URL.to_string()])
    }

    pub fn with_start_urls(start_urls: Vec<String>) -> Self {
        Self { start_urls }
    }
}

impl Default for NostalgiaNerd {
    fn default() -> Self {
        Self::new()
    }
}

impl GallerySite for NostalgiaNerd {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    fn allowed_domains(&self) -> &[&'static str] {
        ALLOWED_DOMAINS
    }

    fn find_galleries<'a>(&'a self, page: &'a Page) -> Box<dyn Iterator<Item = GalleryRef> + 'a> {
        Box::new(
            page.document()
                .select(&PREVIEW_LINK_SELECTOR)
                .filter_map(move |link| {
                    let Some(url) = link.value().attr("href").and_then(|href| page.resolve(href))
                    else {
                        debug!("Skipping gallery link without URL on {}", page.url());
                        return None;
                    };
                    let title = TitleFallback::new()
                        .then(|| link.value().attr("title").map(str::to_string))
                        .then(|| Some(element_text(link)))
                        .resolve_or(&title_from_url(&url));
                    Some(GalleryRef::new(title, url))
                }),
        )
    }

    fn find_images<'a>(
        &'a self,
        page: &'a Page,
        gallery: &'a GalleryRef,
    ) -> Box<dyn Iterator<Item = PendingImage> + 'a> {
        let sources = ImageSources::default();

        Box::new(
            page.document()
                .select(&CONTENT_SELECTOR)
                .flat_map(|container| {
                    container
                        .select(&IMAGE_SELECTOR)
                        .map(move |image| (container, image))
                })
                .filter_map(move |(container, image)| {
                    let urls = page.resolve_all(extract_image_urls(image, &sources));
                    if urls.is_empty() {
                        return None;
                    }
                    let title = TitleFallback::new()
                        .then(|| image.value().attr("alt").map(str::to_string))
                        .then(|| heading_context(image, container))
                        .then(|| Some(gallery.title.clone()))
                        .resolve_or(&title_from_url(&gallery.url));
                    Some(gallery.image(NAME, title, urls))
                }),
        )
    }
}
