//! Which gallery links a crawl follows.

use std::collections::HashSet;

use url::Url;

use crate::error_handling::{InfoType, ProcessingStats};

/// True when `url`'s host is one of `domains` or a subdomain of one.
pub fn host_allowed(url: &str, domains: &[&str]) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };
    domains.iter().any(|domain| {
        let domain = domain.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}

/// Visit key for a gallery URL: the fragment does not name a different page.
fn visit_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Gallery URLs already scheduled in this run.
#[derive(Debug, Default)]
pub struct CrawlScope {
    visited: HashSet<String>,
}

impl CrawlScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether a gallery URL should be fetched, recording it if so.
    ///
    /// Offsite and already-visited URLs are counted and refused.
    pub fn admit(&mut self, url: &str, domains: &[&str], stats: &ProcessingStats) -> bool {
        if !host_allowed(url, domains) {
            log::debug!("Skipping offsite gallery {url}");
            stats.increment_info(InfoType::OffsiteGallery);
            return false;
        }
        if !self.visited.insert(visit_key(url)) {
            log::debug!("Skipping already visited gallery {url}");
            stats.increment_info(InfoType::DuplicateGallery);
            return false;
        }
        true
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_allowed() {
        assert!(host_allowed("https://oldcrap.org/2017/12/03/pet/", &["oldcrap.org"]));
        assert!(host_allowed("https://www.nostalgianerd.com/x/", &["nostalgianerd.com"]));
        assert!(host_allowed("https://OldCrap.org/", &["oldcrap.org"]));
        assert!(!host_allowed("https://notoldcrap.org/", &["oldcrap.org"]));
        assert!(!host_allowed("https://i0.wp.com/oldcrap.org/a.jpg", &["oldcrap.org"]));
        assert!(!host_allowed("not a url", &["oldcrap.org"]));
        assert!(!host_allowed("https://oldcrap.org/", &[]));
    }

    #[test]
    fn test_admit_counts_offsite_and_duplicates() {
        let stats = ProcessingStats::new();
        let mut scope = CrawlScope::new();
        let domains = ["oldcrap.org"];

        assert!(scope.admit("https://oldcrap.org/a/", &domains, &stats));
        assert!(!scope.admit("https://oldcrap.org/a/", &domains, &stats));
        assert!(!scope.admit("https://oldcrap.org/a/#comments", &domains, &stats));
        assert!(!scope.admit("https://facebook.com/share", &domains, &stats));
        assert!(scope.admit("https://oldcrap.org/b/", &domains, &stats));

        assert_eq!(scope.visited(), 2);
        assert_eq!(stats.get_info_count(InfoType::DuplicateGallery), 2);
        assert_eq!(stats.get_info_count(InfoType::OffsiteGallery), 1);
    }
}
