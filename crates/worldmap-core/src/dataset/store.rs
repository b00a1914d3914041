// crates/worldmap-core/src/dataset/store.rs

//! The two cache tiers the dataset loader can persist to.
//!
//! - [`ResponseCache`]: a structured response cache keyed by URL (the browser
//!   Cache API, or a directory of entries on native hosts).
//! - [`KeyValueStore`]: a plain string store keyed by a fixed cache key
//!   (`localStorage`, or memory).
//!
//! Every method takes `&self`; implementations use interior mutability since
//! the pipeline runs on a single thread.

use crate::error::{MapError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[allow(async_fn_in_trait)]
pub trait ResponseCache {
    /// `false` when the runtime has no structured cache; the loader then
    /// switches to the key-value tier.
    fn is_available(&self) -> bool {
        true
    }

    async fn lookup(&self, url: &str) -> Result<Option<String>>;

    async fn store(&self, url: &str, payload: &str) -> Result<()>;
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: ResponseCache + ?Sized> ResponseCache for &T {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }
    async fn lookup(&self, url: &str) -> Result<Option<String>> {
        (**self).lookup(url).await
    }
    async fn store(&self, url: &str, payload: &str) -> Result<()> {
        (**self).store(url, payload).await
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

// -----------------------------------------------------------------------------
// STRUCTURED TIER
// -----------------------------------------------------------------------------

/// Session-scoped response cache.
#[derive(Debug, Default)]
pub struct MemoryResponseCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops every entry, as a browser would on storage eviction.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ResponseCache for MemoryResponseCache {
    async fn lookup(&self, url: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(url).cloned())
    }

    async fn store(&self, url: &str, payload: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(url.to_string(), payload.to_string());
        Ok(())
    }
}

/// Stands in for a runtime without a structured cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResponseCache;

impl ResponseCache for NoResponseCache {
    fn is_available(&self) -> bool {
        false
    }

    async fn lookup(&self, _url: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn store(&self, url: &str, _payload: &str) -> Result<()> {
        Err(MapError::Cache(format!(
            "no structured cache available to store {url}"
        )))
    }
}

// -----------------------------------------------------------------------------
// KEY-VALUE TIER
// -----------------------------------------------------------------------------

/// In-memory string store with an optional quota in bytes (keys + values),
/// mimicking the limits of browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(MapError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
