//! Site variants: per-site rules for finding galleries and images.
//!
//! Every supported site implements [`GallerySite`]; the crawl driver only
//! knows the trait and looks variants up in the [`SiteRegistry`].

mod heading;
mod nostalgia_nerd;
mod old_crap;
mod registry;

use indexmap::IndexSet;
use scraper::{ElementRef, Html};
use url::Url;

use crate::item::{GalleryRef, PendingImage};

pub use heading::heading_context;
pub use nostalgia_nerd::NostalgiaNerd;
pub use old_crap::OldCrap;
pub use registry::{SiteRegistry, UnknownSite};

/// A fetched HTML page and the URL it was fetched from.
///
/// The parsed document is not `Send`; pages are parsed, mined and dropped
/// without crossing an `.await`.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(body),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Resolves a link found on this page to an absolute http(s) URL.
    ///
    /// Returns `None` for empty links, links that fail to parse, and
    /// non-web schemes such as `mailto:` or `javascript:`.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let resolved = self.url.join(href).ok()?;
        matches!(resolved.scheme(), "http" | "https").then(|| resolved.into())
    }

    /// Resolves every URL, dropping unresolvable ones and duplicates.
    pub fn resolve_all(&self, urls: impl IntoIterator<Item = String>) -> Vec<String> {
        urls.into_iter()
            .filter_map(|url| self.resolve(&url))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Parsing rules for one gallery website.
pub trait GallerySite: Send + Sync {
    /// Identifier used on the command line and as the first storage path component.
    fn name(&self) -> &'static str;

    /// Index pages the crawl starts from.
    fn start_urls(&self) -> &[String];

    /// Domains gallery links may point to; subdomains are included.
    fn allowed_domains(&self) -> &[&'static str];

    /// Finds the galleries linked from an index page.
    ///
    /// Links without a URL are skipped. Links without a title get one built
    /// from the URL.
    fn find_galleries<'a>(&'a self, page: &'a Page) -> Box<dyn Iterator<Item = GalleryRef> + 'a>;

    /// Finds the images on a gallery page.
    ///
    /// An image group without any URL is never yielded. URLs are absolute.
    fn find_images<'a>(
        &'a self,
        page: &'a Page,
        gallery: &'a GalleryRef,
    ) -> Box<dyn Iterator<Item = PendingImage> + 'a>;
}

/// Text content of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
