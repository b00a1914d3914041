// crates/worldmap-core/src/lib.rs

//! # worldmap-core
//!
//! Host-independent pipeline behind an interactive world map of country
//! boundaries:
//!
//! - [`dataset`]: load the boundary GeoJSON through a two-tier cache with a
//!   fallback source.
//! - [`layer`]: one interactive region per feature, hover highlight, click.
//! - [`resolve`]: turn a clicked feature into a [`RegionSelection`].
//! - [`component`]: mount / deferred init / destroy lifecycle and selection
//!   broadcast.
//! - [`country`], [`weather`], [`hydrate`]: what a detail view does with a
//!   selection.
//!
//! Drawing is abstracted behind [`layer::MapSurface`]; the browser binding
//! lives in `worldmap-wasm`, and [`layer::HeadlessSurface`] serves the CLI and
//! tests.

pub mod catalog;
pub mod component;
pub mod config;
pub mod country;
pub mod dataset;
pub mod deferred;
pub mod emitter;
pub mod error;
pub mod extract;
pub mod hydrate;
pub mod layer;
pub mod model;
pub mod resolve;
pub mod text;
pub mod weather;

// Re-exports
pub use crate::component::{LoadRequest, WorldMap};
pub use crate::config::{MapConfig, ThemeMode};
pub use crate::country::{match_country, CountryDirectory, CountryRecord, RestCountriesClient};
pub use crate::dataset::{DatasetLoader, HttpFetch, LoadDataset};
pub use crate::error::{MapError, Result};
pub use crate::hydrate::{CountryDetails, DetailHydrator, Hydration};
pub use crate::model::{Coordinates, Dataset, DatasetSource, GeoFeature, RegionSelection};
pub use crate::resolve::SelectionResolver;
pub use crate::weather::{OpenMeteoClient, Weather, WeatherSource};

/// Everything a host needs to wire up a map.
pub mod prelude {
    pub use crate::catalog::{CatalogQuery, CountryCatalog, RegionIndex};
    pub use crate::component::{LoadRequest, WorldMap};
    pub use crate::config::{MapConfig, ThemeMode};
    pub use crate::country::{CountryDirectory, CountryRecord, RestCountriesClient};
    pub use crate::dataset::{
        DatasetLoader, HttpFetch, KeyValueStore, LoadDataset, MemoryResponseCache, MemoryStore,
        NoResponseCache, ResponseCache,
    };
    #[cfg(feature = "disk-cache")]
    pub use crate::dataset::DiskResponseCache;
    #[cfg(feature = "http")]
    pub use crate::dataset::ReqwestFetcher;
    pub use crate::deferred::{InitState, VisibilityObserver};
    pub use crate::emitter::ListenerId;
    pub use crate::error::{MapError, Result};
    pub use crate::hydrate::{DetailHydrator, Hydration};
    pub use crate::layer::{HeadlessSurface, MapSurface, RegionEvent, RegionId, RegionState};
    pub use crate::model::{Coordinates, Dataset, DatasetSource, RegionSelection};
    pub use crate::resolve::SelectionResolver;
    pub use crate::weather::{OpenMeteoClient, WeatherSource};
}
