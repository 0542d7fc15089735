//! Browser-like request headers.

use reqwest::header::{HeaderName, ACCEPT, ACCEPT_LANGUAGE, REFERER, UPGRADE_INSECURE_REQUESTS};
use reqwest::RequestBuilder;

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Request headers mimicking a desktop Chrome browser.
///
/// WordPress hosts and the Jetpack image CDN answer bare clients with
/// placeholder images or 403s, so every request carries the headers a
/// browser would send for the same navigation. `Accept-Encoding` is left to
/// reqwest, which only advertises the codings it can decode.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Headers for a top-level page navigation.
    pub(crate) fn page(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, PAGE_ACCEPT)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(HeaderName::from_static("sec-fetch-dest"), "document")
            .header(HeaderName::from_static("sec-fetch-mode"), "navigate")
            .header(HeaderName::from_static("sec-fetch-site"), "none")
            .header(HeaderName::from_static("sec-fetch-user"), "?1")
            .header(UPGRADE_INSECURE_REQUESTS, "1")
    }

    /// Headers for an image embedded in the page at `referer`.
    pub(crate) fn image(builder: RequestBuilder, referer: Option<&str>) -> RequestBuilder {
        let builder = builder
            .header(ACCEPT, IMAGE_ACCEPT)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(HeaderName::from_static("sec-fetch-dest"), "image")
            .header(HeaderName::from_static("sec-fetch-mode"), "no-cors")
            .header(HeaderName::from_static("sec-fetch-site"), "cross-site");
        match referer {
            Some(referer) => builder.header(REFERER, referer),
            None => builder,
        }
    }
}
