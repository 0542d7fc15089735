// Shared test helpers: fixture loading and sites that can be crawled against
// a local mock server.

use retrogallery::item::{GalleryRef, PendingImage};
use retrogallery::{GallerySite, Page};
use url::Url;

/// Reads an HTML fixture from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

/// Parses a fixture as if it had been fetched from `url`.
#[allow(dead_code)] // Used by other test files
pub fn fixture_page(url: &str, name: &str) -> Page {
    Page::parse(Url::parse(url).expect("valid test URL"), &fixture(name))
}

/// Mock server bound to the IPv4 loopback that `LocalSite` allows.
#[allow(dead_code)] // Used by other test files
pub fn local_server() -> httptest::Server {
    httptest::ServerBuilder::new()
        .bind_addr(([127, 0, 0, 1], 0).into())
        .run()
        .unwrap()
}

/// Runs a real site's parsing rules against pages served from 127.0.0.1.
#[allow(dead_code)] // Used by other test files
pub struct LocalSite<S> {
    inner: S,
    start_urls: Vec<String>,
}

#[allow(dead_code)]
impl<S: GallerySite> LocalSite<S> {
    pub fn new(inner: S, start_url: String) -> Self {
        Self {
            inner,
            start_urls: vec![start_url],
        }
    }
}

impl<S: GallerySite> GallerySite for LocalSite<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    fn allowed_domains(&self) -> &[&'static str] {
        &["127.0.0.1"]
    }

    fn find_galleries<'a>(&'a self, page: &'a Page) -> Box<dyn Iterator<Item = GalleryRef> + 'a> {
        self.inner.find_galleries(page)
    }

    fn find_images<'a>(
        &'a self,
        page: &'a Page,
        gallery: &'a GalleryRef,
    ) -> Box<dyn Iterator<Item = PendingImage> + 'a> {
        self.inner.find_images(page, gallery)
    }
}
