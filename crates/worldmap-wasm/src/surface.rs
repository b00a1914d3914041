// crates/worldmap-wasm/src/surface.rs

//! JavaScript-side collaborators: the drawing surface (typically a thin
//! wrapper over a Leaflet map) and the visibility observer.
//!
//! The surface object must provide:
//!
//! ```javascript
//! {
//!   initialize(view, tiles),            // may throw
//!   addRegion(id, feature, style, tooltip), // may throw
//!   setRegionStyle(id, style),
//!   bringToFront(id),
//!   remove(),
//! }
//! ```
//!
//! and forward `mouseover` / `mouseout` / `click` of region `id` to
//! `WorldMapHandle.hover/unhover/click`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use worldmap_core::config::ViewOptions;
use worldmap_core::deferred::VisibilityObserver;
use worldmap_core::layer::{MapSurface, RegionId, RegionStyle, TileLayer};
use worldmap_core::{GeoFeature, MapError};

#[wasm_bindgen]
extern "C" {
    pub type JsMapSurface;

    #[wasm_bindgen(method, catch)]
    fn initialize(this: &JsMapSurface, view: JsValue, tiles: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = addRegion)]
    fn add_region(
        this: &JsMapSurface,
        id: u32,
        feature: JsValue,
        style: JsValue,
        tooltip: &str,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setRegionStyle)]
    fn set_region_style(this: &JsMapSurface, id: u32, style: JsValue);

    #[wasm_bindgen(method, js_name = bringToFront)]
    fn bring_to_front(this: &JsMapSurface, id: u32);

    #[wasm_bindgen(method)]
    fn remove(this: &JsMapSurface);

    /// Anything with `disconnect()`, e.g. an `IntersectionObserver`.
    pub type JsVisibilityObserver;

    #[wasm_bindgen(method)]
    fn disconnect(this: &JsVisibilityObserver);
}

/// Plain JS objects, not `Map`s, so the surface can read fields directly.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn surface_error(context: &str, e: JsValue) -> MapError {
    MapError::Surface(format!("{context}: {e:?}"))
}

fn region_index(id: RegionId) -> u32 {
    u32::try_from(id).unwrap_or(u32::MAX)
}

/// [`MapSurface`] that forwards every call to a [`JsMapSurface`].
pub struct JsSurface {
    inner: JsMapSurface,
}

impl JsSurface {
    pub fn new(inner: JsMapSurface) -> Self {
        Self { inner }
    }

    fn style_value(style: &RegionStyle) -> Option<JsValue> {
        match to_js(style) {
            Ok(v) => Some(v),
            Err(e) => {
                web_sys::console::error_2(&"worldmap: style not serializable".into(), &e);
                None
            }
        }
    }
}

impl MapSurface for JsSurface {
    fn initialize(&mut self, view: &ViewOptions, tiles: &TileLayer) -> worldmap_core::Result<()> {
        let view = to_js(view).map_err(|e| surface_error("view options", e))?;
        let tiles = to_js(tiles).map_err(|e| surface_error("tile layer", e))?;
        self.inner
            .initialize(view, tiles)
            .map_err(|e| surface_error("initialize", e))
    }

    fn add_region(
        &mut self,
        id: RegionId,
        feature: &GeoFeature,
        style: &RegionStyle,
        tooltip: &str,
    ) -> worldmap_core::Result<()> {
        let feature = to_js(feature).map_err(|e| surface_error("feature", e))?;
        let style = to_js(style).map_err(|e| surface_error("style", e))?;
        self.inner
            .add_region(region_index(id), feature, style, tooltip)
            .map_err(|e| surface_error("addRegion", e))
    }

    fn set_region_style(&mut self, id: RegionId, style: &RegionStyle) {
        if let Some(style) = Self::style_value(style) {
            self.inner.set_region_style(region_index(id), style);
        }
    }

    fn bring_to_front(&mut self, id: RegionId) {
        self.inner.bring_to_front(region_index(id));
    }

    fn remove_self(&mut self) {
        self.inner.remove();
    }
}

/// Optional JS observer; disconnects at most once.
pub struct JsObserver {
    inner: Option<JsVisibilityObserver>,
}

impl JsObserver {
    pub fn new(inner: Option<JsVisibilityObserver>) -> Self {
        Self { inner }
    }
}

impl VisibilityObserver for JsObserver {
    fn disconnect(&mut self) {
        if let Some(observer) = self.inner.take() {
            observer.disconnect();
        }
    }
}
