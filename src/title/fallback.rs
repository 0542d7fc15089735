//! Ordered title fallback chains.

use super::camera::usable_title;

type Candidate<'a> = Box<dyn FnOnce() -> Option<String> + 'a>;

/// An explicit, ordered list of title sources.
///
/// Sources are evaluated lazily in the order they were added; the first one
/// producing a usable title (non-empty, not a camera-default filename) wins.
///
/// ```
/// use retrogallery::title::TitleFallback;
///
/// let title = TitleFallback::new()
///     .then(|| Some("IMG_0042".to_string()))
///     .then(|| None)
///     .then(|| Some("Sinclair QL".to_string()))
///     .resolve_or("Gallery");
/// assert_eq!(title, "Sinclair QL");
/// ```
#[derive(Default)]
pub struct TitleFallback<'a> {
    candidates: Vec<Candidate<'a>>,
}

impl<'a> TitleFallback<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a title source to the end of the chain.
    pub fn then<F>(mut self, candidate: F) -> Self
    where
        F: FnOnce() -> Option<String> + 'a,
    {
        self.candidates.push(Box::new(candidate));
        self
    }

    /// Returns the first usable title, trimmed, if any source produced one.
    pub fn resolve(self) -> Option<String> {
        self.candidates
            .into_iter()
            .find_map(|candidate| usable_title(candidate().as_deref()).map(|t| t.trim().to_string()))
    }

    /// Returns the first usable title, or `fallback` when every source failed.
    pub fn resolve_or(self, fallback: &str) -> String {
        self.resolve().unwrap_or_else(|| fallback.to_string())
    }
}
