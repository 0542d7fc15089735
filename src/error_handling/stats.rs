//! Crawl statistics tracking.
//!
//! Thread-safe counters for errors, warnings, and informational metrics
//! recorded while a crawl runs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// One atomic counter per variant of a `strum`-iterable enum.
struct Counters<K: Eq + Hash>(HashMap<K, AtomicUsize>);

impl<K> Counters<K>
where
    K: IntoEnumIterator + Eq + Hash + Copy + std::fmt::Debug,
{
    fn new() -> Self {
        Self(K::iter().map(|k| (k, AtomicUsize::new(0))).collect())
    }

    fn increment(&self, key: K) {
        match self.0.get(&key) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            None => log::error!(
                "Attempted to increment counter for {:?} which is not in the map",
                key
            ),
        }
    }

    fn get(&self, key: K) -> usize {
        self.0
            .get(&key)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn total(&self) -> usize {
        K::iter().map(|k| self.get(k)).sum()
    }
}

/// Thread-safe crawl statistics tracker.
///
/// Every category is initialized to zero on creation, so lookups never miss.
/// Share it across tasks with `Arc`.
pub struct ProcessingStats {
    errors: Counters<ErrorType>,
    warnings: Counters<WarningType>,
    info: Counters<InfoType>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: Counters::new(),
            warnings: Counters::new(),
            info: Counters::new(),
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        self.errors.increment(error);
    }

    pub fn increment_warning(&self, warning: WarningType) {
        self.warnings.increment(warning);
    }

    pub fn increment_info(&self, info_type: InfoType) {
        self.info.increment(info_type);
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(error)
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings.get(warning)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info.get(info_type)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        self.errors.total()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        self.warnings.total()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        self.info.total()
    }
}
