// crates/worldmap-core/src/dataset/mod.rs

//! # Geo Dataset Cache
//!
//! Loads the country-boundary GeoJSON with a two-tier cache and a fallback
//! source.
//!
//! For each source, in order (primary, then fallback):
//! 1. Structured tier available? Look the URL up; a hit is parsed and
//!    returned. A miss is fetched, stored (best-effort) and returned.
//! 2. Otherwise use the key-value tier under the source's `cache_key`, with
//!    the same hit/miss logic. Quota failures on write are swallowed.
//!
//! A structured tier that reports itself available but fails the lookup
//! (e.g. `caches.open` rejected in private browsing) is treated as
//! unavailable for that load, so the key-value tier takes over.
//!
//! Only when both sources fail does [`DatasetLoader::load`] return an error;
//! callers then render an empty map.

mod disk;
mod fetch;
mod store;

#[cfg(feature = "disk-cache")]
pub use disk::{DiskResponseCache, CACHE_SUFFIX};
#[cfg(feature = "http")]
pub use fetch::ReqwestFetcher;
pub use fetch::HttpFetch;
pub use store::{KeyValueStore, MemoryResponseCache, MemoryStore, NoResponseCache, ResponseCache};

use crate::error::{MapError, Result};
use crate::model::{Dataset, DatasetSource};

/// Anything that can produce the boundary dataset from a primary and a
/// fallback source. The map component only depends on this.
#[allow(async_fn_in_trait)]
pub trait LoadDataset {
    async fn load(&self, primary: &DatasetSource, fallback: &DatasetSource) -> Result<Dataset>;
}

impl<T: LoadDataset + ?Sized> LoadDataset for &T {
    async fn load(&self, primary: &DatasetSource, fallback: &DatasetSource) -> Result<Dataset> {
        (**self).load(primary, fallback).await
    }
}

impl<T: LoadDataset + ?Sized> LoadDataset for std::rc::Rc<T> {
    async fn load(&self, primary: &DatasetSource, fallback: &DatasetSource) -> Result<Dataset> {
        (**self).load(primary, fallback).await
    }
}

/// Fetcher plus the two cache tiers.
#[derive(Debug)]
pub struct DatasetLoader<F, C, S> {
    fetcher: F,
    cache: C,
    store: S,
}

impl<F, C, S> DatasetLoader<F, C, S>
where
    F: HttpFetch,
    C: ResponseCache,
    S: KeyValueStore,
{
    pub fn new(fetcher: F, cache: C, store: S) -> Self {
        Self {
            fetcher,
            cache,
            store,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads one source through whichever tier the runtime supports.
    pub async fn load_source(&self, source: &DatasetSource) -> Result<Dataset> {
        if self.cache.is_available() {
            self.load_structured(source).await
        } else {
            self.load_key_value(source).await
        }
    }

    async fn load_structured(&self, source: &DatasetSource) -> Result<Dataset> {
        match self.cache.lookup(&source.url).await {
            Ok(Some(payload)) => match Dataset::parse(&payload) {
                Ok(ds) => {
                    log::debug!("dataset cache hit for {}", source.url);
                    return Ok(ds);
                }
                Err(e) => log::warn!("cached dataset for {} is unusable: {e}", source.url),
            },
            Ok(None) => log::debug!("dataset cache miss for {}", source.url),
            Err(e) => {
                log::warn!(
                    "dataset cache lookup failed for {}: {e}; using key {}",
                    source.url,
                    source.cache_key
                );
                return self.load_key_value(source).await;
            }
        }

        let payload = self.fetcher.fetch(&source.url).await?;
        let dataset = Dataset::parse(&payload)?;

        if let Err(e) = self.cache.store(&source.url, &payload).await {
            log::debug!("could not cache {}: {e}", source.url);
        }
        Ok(dataset)
    }

    async fn load_key_value(&self, source: &DatasetSource) -> Result<Dataset> {
        match self.store.get(&source.cache_key) {
            Ok(Some(payload)) => match Dataset::parse(&payload) {
                Ok(ds) => {
                    log::debug!("dataset store hit for key {}", source.cache_key);
                    return Ok(ds);
                }
                Err(e) => log::warn!("stored dataset under {} is unusable: {e}", source.cache_key),
            },
            Ok(None) => log::debug!("dataset store miss for key {}", source.cache_key),
            Err(e) => log::warn!("dataset store read failed for {}: {e}", source.cache_key),
        }

        let payload = self.fetcher.fetch(&source.url).await?;
        let dataset = Dataset::parse(&payload)?;

        // Country boundaries easily exceed browser storage quotas.
        if let Err(e) = self.store.set(&source.cache_key, &payload) {
            log::debug!("could not persist {}: {e}", source.cache_key);
        }
        Ok(dataset)
    }
}

impl<F, C, S> LoadDataset for DatasetLoader<F, C, S>
where
    F: HttpFetch,
    C: ResponseCache,
    S: KeyValueStore,
{
    async fn load(&self, primary: &DatasetSource, fallback: &DatasetSource) -> Result<Dataset> {
        let primary_err = match self.load_source(primary).await {
            Ok(ds) => {
                log::info!("loaded {} regions from {}", ds.len(), primary.url);
                return Ok(ds);
            }
            Err(e) => e,
        };
        log::warn!(
            "primary dataset {} failed ({primary_err}); trying {}",
            primary.url,
            fallback.url
        );

        match self.load_source(fallback).await {
            Ok(ds) => {
                log::info!("loaded {} regions from {}", ds.len(), fallback.url);
                Ok(ds)
            }
            Err(fallback_err) => Err(MapError::DatasetUnavailable {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}
