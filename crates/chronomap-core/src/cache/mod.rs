pub mod key;

pub use key::LayerKey;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use tracing::debug;

/// Counters for how the cache has been used since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub renders: u64,
    pub hits: u64,
    pub invalidations: u64,
}

/// Memoized render results with explicit, selective invalidation.
///
/// A stored surface is handed out as an `Rc`, so the same allocation is
/// returned until the key is invalidated. Holders of an old `Rc` keep a
/// valid (if outdated) surface; the cache's own reference is dropped on
/// invalidation.
pub struct RenderCache<K, S> {
    entries: HashMap<K, Rc<S>>,
    max_entries: Option<usize>,
    stats: CacheStats,
}

impl<K, S> RenderCache<K, S>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: None,
            stats: CacheStats::default(),
        }
    }

    /// A cache that drops all entries before inserting past `max_entries`.
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new()
        }
    }

    /// Return the stored surface for `key`, rendering it first if absent.
    ///
    /// A failed render stores nothing, so the next call retries.
    pub fn get_or_render<E>(
        &mut self,
        key: &K,
        render: impl FnOnce() -> Result<S, E>,
    ) -> Result<Rc<S>, E> {
        if let Some(surface) = self.entries.get(key) {
            self.stats.hits += 1;
            return Ok(Rc::clone(surface));
        }
        let surface = Rc::new(render()?);
        self.store(key.clone(), Rc::clone(&surface));
        Ok(surface)
    }

    /// Infallible variant of [`get_or_render`](Self::get_or_render).
    pub fn get_or_insert_with(&mut self, key: &K, render: impl FnOnce() -> S) -> Rc<S> {
        if let Some(surface) = self.entries.get(key) {
            self.stats.hits += 1;
            return Rc::clone(surface);
        }
        let surface = Rc::new(render());
        self.store(key.clone(), Rc::clone(&surface));
        surface
    }

    fn store(&mut self, key: K, surface: Rc<S>) {
        if let Some(max) = self.max_entries {
            if self.entries.len() >= max {
                debug!(entries = self.entries.len(), "render cache full, flushing");
                self.entries.clear();
            }
        }
        debug!(key = ?key, "rendered");
        self.stats.renders += 1;
        self.entries.insert(key, surface);
    }

    pub fn get(&self, key: &K) -> Option<Rc<S>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop the entry for `key`. Returns whether anything was stored;
    /// invalidating a missing key is a no-op.
    pub fn invalidate(&mut self, key: &K) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(key = ?key, "invalidated");
            self.stats.invalidations += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.stats.invalidations += self.entries.len() as u64;
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K, S> Default for RenderCache<K, S>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
