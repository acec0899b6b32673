//! Memoized resolve orders, shareable across calculators.

use std::sync::Arc;

use dashmap::DashMap;

/// A memo of resolve orders keyed by the sorted, pipe-joined set of batch
/// variable names.
///
/// The key deliberately ignores expression text: two batches naming the
/// same variables share an entry even when their formulas differ. A
/// redefinition that changes the dependency structure without changing
/// the name set therefore reads a stale order until
/// [`clear`](Self::clear) is called.
#[derive(Debug, Default)]
pub struct ResolveOrderCache {
    entries: DashMap<String, Arc<[String]>>,
}

impl ResolveOrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a batch: its canonical names, sorted and joined
    /// with `|`.
    pub fn key_for<'a, I>(names: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: Vec<&str> = names.into_iter().collect();
        names.sort_unstable();
        names.join("|")
    }

    pub fn get(&self, key: &str) -> Option<Arc<[String]>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn put(&self, key: String, order: Arc<[String]>) {
        self.entries.insert(key, order);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
