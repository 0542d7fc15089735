//! Lookup of site variants by identifier.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use super::{GallerySite, NostalgiaNerd, OldCrap};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown site '{name}' (known sites: {known})")]
pub struct UnknownSite {
    pub name: String,
    pub known: String,
}

/// Site variants keyed by their identifier.
#[derive(Default, Clone)]
pub struct SiteRegistry {
    sites: BTreeMap<&'static str, Arc<dyn GallerySite>>,
}

impl SiteRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in site.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NostalgiaNerd::new()));
        registry.register(Arc::new(OldCrap::new()));
        registry
    }

    /// Adds a site, replacing any site registered under the same name.
    pub fn register(&mut self, site: Arc<dyn GallerySite>) {
        self.sites.insert(site.name(), site);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn GallerySite>> {
        self.sites.get(name).cloned()
    }

    /// Registered identifiers in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sites.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GallerySite>> {
        self.sites.values()
    }

    /// Looks up the named sites, or every registered site when `names` is empty.
    ///
    /// # Errors
    ///
    /// Fails on the first name that is not registered.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Arc<dyn GallerySite>>, UnknownSite> {
        if names.is_empty() {
            return Ok(self.sites.values().cloned().collect());
        }
        names
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| UnknownSite {
                    name: name.clone(),
                    known: self.names().join(", "),
                })
            })
            .collect()
    }
}
