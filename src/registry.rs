//! Per-base-URL schema cache.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::loader::SchemaSource;
use crate::schema::Schema;

type Entry = Option<Arc<Schema>>;

/// Cache of loaded schemas keyed by base URL.
///
/// A `None` entry records that loading was attempted and produced nothing,
/// so failed loads are not retried until the entry is cleared.
///
/// The lock is never held while a source loads: concurrent misses for the
/// same base URL may each call the source, and the last write wins.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    cache: RwLock<HashMap<String, Entry>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by clients that are not given one.
    pub fn global() -> Arc<SchemaRegistry> {
        static GLOBAL: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(SchemaRegistry::new())))
    }

    /// Return the cached schema for `base_url`, loading it on first access.
    pub fn get_schema(&self, base_url: &str, source: &dyn SchemaSource) -> Option<Arc<Schema>> {
        if let Some(entry) = self.cached(base_url) {
            tracing::debug!(base_url, hit = entry.is_some(), "schema cache hit");
            return entry;
        }

        tracing::debug!(base_url, "schema cache miss");
        let entry = source.load_schema().map(Arc::new);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(base_url.to_string(), entry.clone());
        entry
    }

    fn cached(&self, base_url: &str) -> Option<Entry> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(base_url)
            .cloned()
    }

    /// Whether an entry (possibly empty) exists for `base_url`.
    pub fn is_cached(&self, base_url: &str) -> bool {
        self.cached(base_url).is_some()
    }

    /// Evict one entry, or every entry when `base_url` is `None`.
    pub fn clear_cache(&self, base_url: Option<&str>) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match base_url {
            Some(url) => {
                cache.remove(url);
            }
            None => cache.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
