//! worldmap-wasm: WebAssembly bindings for worldmap-core
//!
//! Wires the selection pipeline to a browser page. The page supplies the
//! drawing surface (see [`surface`]) and, in deferred mode, reports the
//! visibility of the map container; everything else (dataset loading with
//! Cache API / `localStorage` tiers, hover state, selection resolution and
//! broadcast, country matching, weather) runs in Rust.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { WorldMapHandle, hydrate } from 'worldmap-wasm';
//!
//! await init();
//! let map;
//! const observer = new IntersectionObserver(([e]) => map.notify_visibility(e.isIntersecting));
//! map = new WorldMapHandle(leafletSurface, { deferred: true }, observer);
//! observer.observe(container);
//!
//! map.subscribe(async (selection) => {
//!   const result = await hydrate(selection);
//!   if (result.status === 'ready') showDetails(result.details);
//! });
//! ```
//!
//! Notes
//! -----
//! - Listeners run synchronously inside `click`; calling back into the same
//!   handle from a listener throws instead of re-entering.
//! - `mount` / `notify_visibility` return a promise of the number of regions
//!   drawn (0 when nothing started or the dataset was unavailable).
mod storage;
pub mod surface;

pub use storage::{BrowserCache, LocalStorage, CACHE_NAME};

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use worldmap_core::config::{COUNTRIES_API_URL, WEATHER_API_URL};
use worldmap_core::dataset::{DatasetLoader, LoadDataset, ReqwestFetcher};
use worldmap_core::emitter::ListenerId;
use worldmap_core::layer::RegionId;
use worldmap_core::{match_country as match_country_core, CountryDetails};
use worldmap_core::{
    DetailHydrator, GeoFeature, Hydration, LoadRequest, MapConfig, OpenMeteoClient,
    RegionSelection, RestCountriesClient, SelectionResolver, WorldMap,
};

use crate::surface::{to_js, JsMapSurface, JsObserver, JsSurface, JsVisibilityObserver};

type BrowserLoader = DatasetLoader<ReqwestFetcher, BrowserCache, LocalStorage>;
type BrowserMap = WorldMap<JsSurface, JsObserver>;
type BrowserHydrator =
    DetailHydrator<RestCountriesClient<ReqwestFetcher>, OpenMeteoClient<ReqwestFetcher>>;

thread_local! {
    static HYDRATOR: RefCell<Option<Rc<BrowserHydrator>>> = const { RefCell::new(None) };
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing worldmap WASM module...".into());
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/* --------------------------------------------------------------------------
   Selection resolution
-------------------------------------------------------------------------- */

/// Resolves a GeoJSON feature to `{ name, code, coordinates }`.
#[wasm_bindgen]
pub fn resolve_feature(feature: JsValue) -> Result<JsValue, JsValue> {
    let feature: GeoFeature = serde_wasm_bindgen::from_value(feature)?;
    to_js(&SelectionResolver::default().resolve(&feature))
}

/* --------------------------------------------------------------------------
   Country match and detail hydration
-------------------------------------------------------------------------- */

fn countries_client() -> Result<RestCountriesClient<ReqwestFetcher>, JsValue> {
    RestCountriesClient::new(ReqwestFetcher::new(), COUNTRIES_API_URL).map_err(js_error)
}

fn hydrator() -> Result<Rc<BrowserHydrator>, JsValue> {
    HYDRATOR.with(|slot| {
        if let Some(h) = slot.borrow().as_ref() {
            return Ok(Rc::clone(h));
        }
        let weather =
            OpenMeteoClient::new(ReqwestFetcher::new(), WEATHER_API_URL).map_err(js_error)?;
        let h = Rc::new(DetailHydrator::new(countries_client()?, weather));
        *slot.borrow_mut() = Some(Rc::clone(&h));
        Ok(h)
    })
}

/// Resolves to the matched country record, or `null`.
#[wasm_bindgen]
pub fn match_country(code: String, name: String) -> js_sys::Promise {
    future_to_promise(async move {
        let client = countries_client()?;
        match match_country_core(&client, &code, &name).await {
            Some(record) => to_js(&record),
            None => Ok(JsValue::NULL),
        }
    })
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum HydrationView {
    Ready { details: CountryDetails },
    NotFound,
    Superseded,
}

/// Resolves to `{ status: "ready", details }`, `{ status: "not_found" }` or
/// `{ status: "superseded" }` when a newer call started in the meantime.
#[wasm_bindgen]
pub fn hydrate(selection: JsValue) -> js_sys::Promise {
    future_to_promise(async move {
        let selection: RegionSelection = serde_wasm_bindgen::from_value(selection)?;
        let view = match hydrator()?.hydrate(&selection).await {
            Hydration::Ready(details) => HydrationView::Ready { details },
            Hydration::NotFound => HydrationView::NotFound,
            Hydration::Superseded => HydrationView::Superseded,
        };
        to_js(&view)
    })
}

/// Invalidates in-flight hydrations (the detail view was closed).
#[wasm_bindgen]
pub fn cancel_hydration() -> Result<(), JsValue> {
    hydrator()?.cancel();
    Ok(())
}

/* --------------------------------------------------------------------------
   Map handle
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct WorldMapHandle {
    map: Rc<RefCell<BrowserMap>>,
    loader: Rc<BrowserLoader>,
}

impl WorldMapHandle {
    fn with_map<R>(&self, f: impl FnOnce(&mut BrowserMap) -> R) -> Result<R, JsValue> {
        let mut map = self
            .map
            .try_borrow_mut()
            .map_err(|_| js_error("worldmap handle is busy"))?;
        Ok(f(&mut map))
    }

    fn complete(&self, request: Option<LoadRequest>) -> js_sys::Promise {
        let map = Rc::clone(&self.map);
        let loader = Rc::clone(&self.loader);
        future_to_promise(async move {
            let Some(request) = request else {
                return Ok(JsValue::from(0));
            };
            let loaded = loader.load(&request.primary, &request.fallback).await;
            let drawn = map
                .try_borrow_mut()
                .map_err(|_| js_error("worldmap handle is busy"))?
                .finish_initialize(loaded);
            web_sys::console::log_1(&format!("worldmap: {drawn} regions drawn").into());
            Ok(JsValue::from(drawn as u32))
        })
    }
}

#[wasm_bindgen]
impl WorldMapHandle {
    /// `config` is a partial `MapConfig` object (or `undefined`); `observer`
    /// is disconnected once the map starts or is destroyed.
    #[wasm_bindgen(constructor)]
    pub fn new(
        surface: JsMapSurface,
        config: JsValue,
        observer: Option<JsVisibilityObserver>,
    ) -> Result<WorldMapHandle, JsValue> {
        let config: MapConfig = if config.is_undefined() || config.is_null() {
            MapConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.palette.validate().map_err(js_error)?;

        let loader = DatasetLoader::new(
            ReqwestFetcher::new(),
            BrowserCache::default(),
            LocalStorage::new(),
        );
        let map = WorldMap::with_observer(config, JsSurface::new(surface), JsObserver::new(observer));
        Ok(Self {
            map: Rc::new(RefCell::new(map)),
            loader: Rc::new(loader),
        })
    }

    /// Eager start; a no-op promise in deferred mode.
    pub fn mount(&self) -> Result<js_sys::Promise, JsValue> {
        let request = self.with_map(|m| m.begin_mount())?.map_err(js_error)?;
        Ok(self.complete(request))
    }

    /// Feed from an `IntersectionObserver`; starts on the first `true`.
    pub fn notify_visibility(&self, visible: bool) -> Result<js_sys::Promise, JsValue> {
        let request = self
            .with_map(|m| m.notify_visibility(visible))?
            .map_err(js_error)?;
        Ok(self.complete(request))
    }

    pub fn hover(&self, id: u32) -> Result<(), JsValue> {
        self.with_map(|m| m.hover(id as RegionId))
    }

    pub fn unhover(&self, id: u32) -> Result<(), JsValue> {
        self.with_map(|m| m.unhover(id as RegionId))
    }

    /// Resolves, broadcasts and returns the selection (`null` for an unknown
    /// region).
    pub fn click(&self, id: u32) -> Result<JsValue, JsValue> {
        match self.with_map(|m| m.click(id as RegionId))? {
            Some(selection) => to_js(&selection),
            None => Ok(JsValue::NULL),
        }
    }

    /// Attaches `listener(selection)`; returns an id for `unsubscribe`.
    pub fn subscribe(&self, listener: js_sys::Function) -> Result<f64, JsValue> {
        let id = self.with_map(|m| {
            m.subscribe(move |selection| {
                let delivered = to_js(selection)
                    .and_then(|value| listener.call1(&JsValue::NULL, &value));
                if let Err(e) = delivered {
                    web_sys::console::error_2(&"worldmap: selection listener failed".into(), &e);
                }
            })
        })?;
        Ok(id.as_u64() as f64)
    }

    pub fn unsubscribe(&self, id: f64) -> Result<bool, JsValue> {
        self.with_map(|m| m.unsubscribe(ListenerId::from_u64(id as u64)))
    }

    pub fn is_loading(&self) -> bool {
        self.map.try_borrow().map(|m| m.is_loading()).unwrap_or(true)
    }

    pub fn destroy(&self) -> Result<(), JsValue> {
        self.with_map(|m| m.destroy())
    }
}
