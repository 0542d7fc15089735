//! oldcrap.org gallery rules.
//!
//! Galleries are listed in the sidebar menu (`div.iksm-term--is-post`).
//! Gallery pages use Jetpack tiled galleries: each `figure.tiled-gallery__item`
//! holds a lazy-loaded `<img>` and a `<noscript>` copy of it. The full-size
//! URL is in `data-orig-file`, and alt text is usually only set on the
//! `<noscript>` copy.

use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::extract::{extract_image_urls, ImageSources};
use crate::item::{GalleryRef, PendingImage};
use crate::title::{title_from_url, usable_title, TitleFallback};
use crate::utils::parse_selector_with_fallback;

use super::{element_text, GallerySite, Page};

const NAME: &str = "oldcrap";
const START_URL: &str = "https://oldcrap.org";
const ALLOWED_DOMAINS: &[&str] = &["oldcrap.org"];

const ORIGINAL_FILE: ImageSources = ImageSources {
    primary: &["data-orig-file"],
    size_variants: &[],
};

static MENU_ENTRY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("div.iksm-term--is-post", "oldcrap menu entries")
});
static MENU_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("a.iksm-term__link", "oldcrap menu links")
});
static MENU_TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("span.iksm-term__text", "oldcrap menu text")
});
static FIGURE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("figure.tiled-gallery__item", "oldcrap figures")
});
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("img", "oldcrap figure images"));
static NOSCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("noscript", "oldcrap noscript images"));
static FIGCAPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("figcaption", "oldcrap captions"));

/// What the images of one figure say about themselves.
#[derive(Debug, Default)]
struct FigureImages {
    urls: Vec<String>,
    alts: Vec<String>,
    image_titles: Vec<String>,
}

impl FigureImages {
    fn visit<'a>(&mut self, images: impl IntoIterator<Item = ElementRef<'a>>) {
        for image in images {
            self.urls.extend(extract_image_urls(image, &ORIGINAL_FILE));
            if let Some(alt) = image.value().attr("alt") {
                self.alts.push(alt.to_string());
            }
            if let Some(title) = image.value().attr("data-image-title") {
                self.image_titles.push(title.to_string());
            }
        }
    }

    /// Collects the figure's images, including those only present as
    /// `<noscript>` markup. URLs may repeat; they are deduplicated on
    /// resolution.
    fn collect(figure: ElementRef<'_>) -> Self {
        let mut images = Self::default();
        images.visit(figure.select(&IMG_SELECTOR));

        for noscript in figure.select(&NOSCRIPT_SELECTOR) {
            let markup: String = noscript.text().collect();
            if markup.trim().is_empty() {
                continue;
            }
            let fragment = Html::parse_fragment(&markup);
            images.visit(fragment.select(&IMG_SELECTOR));
        }
        images
    }
}

fn first_usable(candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| usable_title(Some(candidate)))
        .map(str::to_string)
}

pub struct OldCrap {
    start_urls: Vec<String>,
}

impl OldCrap {
    pub fn new() -> Self {
        Self::with_start_urls(vec![START_URL.to_string()])
    }

    pub fn with_start_urls(start_urls: Vec<String>) -> Self {
        Self { start_urls }
    }
}

impl Default for OldCrap {
    fn default() -> Self {
        Self::new()
    }
}

impl GallerySite for OldCrap {
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
                .select(&MENU_ENTRY_SELECTOR)
                .filter_map(move |entry| {
                    let Some(url) = entry
                        .select(&MENU_LINK_SELECTOR)
                        .next()
                        .and_then(|link| link.value().attr("href"))
                        .and_then(|href| page.resolve(href))
                    else {
                        debug!("Skipping menu entry without URL on {}", page.url());
                        return None;
                    };
                    let title = TitleFallback::new()
                        .then(|| entry.select(&MENU_TEXT_SELECTOR).next().map(element_text))
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
        Box::new(
            page.document()
                .select(&FIGURE_SELECTOR)
                .filter_map(move |figure| {
                    let images = FigureImages::collect(figure);
                    let urls = page.resolve_all(images.urls);
                    if urls.is_empty() {
                        return None;
                    }
                    let title = TitleFallback::new()
                        .then(|| first_usable(&images.alts))
                        .then(|| first_usable(&images.image_titles))
                        .then(|| figure.select(&FIGCAPTION_SELECTOR).next().map(element_text))
                        .then(|| Some(gallery.title.clone()))
                        .resolve_or(&title_from_url(&gallery.url));
                    Some(gallery.image(NAME, title, urls))
                }),
        )
    }
}
