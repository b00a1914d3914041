// crates/worldmap-wasm/src/storage.rs

//! The two browser cache tiers: the Cache API as the structured tier and
//! `localStorage` as the key-value tier.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use worldmap_core::dataset::{KeyValueStore, ResponseCache};
use worldmap_core::{MapError, Result};

pub const CACHE_NAME: &str = "worldmap-datasets";

fn js_error(context: &str, e: JsValue) -> MapError {
    MapError::Cache(format!("{context}: {e:?}"))
}

/* --------------------------------------------------------------------------
   Structured tier (Cache API)
-------------------------------------------------------------------------- */

/// Response cache backed by `window.caches`. Unavailable outside a window or
/// in insecure contexts, where `caches` is undefined.
#[derive(Debug, Clone)]
pub struct BrowserCache {
    name: String,
}

impl Default for BrowserCache {
    fn default() -> Self {
        Self::new(CACHE_NAME)
    }
}

impl BrowserCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn storage() -> Option<web_sys::CacheStorage> {
        let window = web_sys::window()?;
        let caches = js_sys::Reflect::get(&window, &JsValue::from_str("caches")).ok()?;
        if caches.is_undefined() || caches.is_null() {
            return None;
        }
        caches.dyn_into::<web_sys::CacheStorage>().ok()
    }

    async fn open(&self) -> Result<web_sys::Cache> {
        let storage =
            Self::storage().ok_or_else(|| MapError::Cache("Cache API unavailable".into()))?;
        let cache = JsFuture::from(storage.open(&self.name))
            .await
            .map_err(|e| js_error("opening cache", e))?;
        cache
            .dyn_into::<web_sys::Cache>()
            .map_err(|e| js_error("opening cache", e))
    }
}

impl ResponseCache for BrowserCache {
    fn is_available(&self) -> bool {
        Self::storage().is_some()
    }

    async fn lookup(&self, url: &str) -> Result<Option<String>> {
        let cache = self.open().await?;
        let matched = JsFuture::from(cache.match_with_str(url))
            .await
            .map_err(|e| js_error("cache match", e))?;
        if matched.is_undefined() {
            return Ok(None);
        }
        let response: web_sys::Response = matched
            .dyn_into()
            .map_err(|e| js_error("cache match", e))?;
        let body = response.text().map_err(|e| js_error("reading body", e))?;
        let text = JsFuture::from(body)
            .await
            .map_err(|e| js_error("reading body", e))?;
        Ok(text.as_string())
    }

    async fn store(&self, url: &str, payload: &str) -> Result<()> {
        let cache = self.open().await?;
        let response = web_sys::Response::new_with_opt_str(Some(payload))
            .map_err(|e| js_error("building response", e))?;
        JsFuture::from(cache.put_with_str(url, &response))
            .await
            .map_err(|e| js_error("cache put", e))?;
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Key-value tier (localStorage)
-------------------------------------------------------------------------- */

/// `localStorage`, if the page has one. Writes over the origin quota fail
/// and are left to the loader to ignore.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match &self.storage {
            Some(s) => s.get_item(key).map_err(|e| js_error("localStorage read", e)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let Some(s) = &self.storage else {
            return Err(MapError::Cache("localStorage unavailable".into()));
        };
        s.set_item(key, value)
            .map_err(|e| js_error(&format!("localStorage rejected {key}"), e))
    }
}
