// crates/worldmap-core/src/config.rs
use crate::error::{MapError, Result};
use crate::layer::StylePalette;
use crate::model::DatasetSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PRIMARY_DATASET_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";
pub const FALLBACK_DATASET_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";
pub const PRIMARY_CACHE_KEY: &str = "worldmap:countries.geojson";
pub const FALLBACK_CACHE_KEY: &str = "worldmap:countries.fallback.geojson";

pub const COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1";
pub const WEATHER_API_URL: &str = "https://api.open-meteo.com/v1";

/// Background tiles to pair with the regions. Read once when the map is
/// initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(MapError::InvalidData(format!("unknown theme '{other}'"))),
        }
    }
}

/// Camera and bounds of the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub world_copy_jump: bool,
    /// `[[south, west], [north, east]]`
    pub max_bounds: [[f64; 2]; 2],
    pub max_bounds_viscosity: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            center: [30.0, 0.0],
            zoom: 2,
            min_zoom: 2,
            max_zoom: 6,
            world_copy_jump: true,
            max_bounds: [[-90.0, -180.0], [90.0, 180.0]],
            max_bounds_viscosity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub primary: DatasetSource,
    pub fallback: DatasetSource,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            primary: DatasetSource::new(PRIMARY_DATASET_URL, PRIMARY_CACHE_KEY),
            fallback: DatasetSource::new(FALLBACK_DATASET_URL, FALLBACK_CACHE_KEY),
        }
    }
}

/// Everything the map component needs, injected at construction.
///
/// Every field has a default, so a TOML file only lists what it overrides:
///
/// ```toml
/// theme = "dark"
/// deferred = true
///
/// [view]
/// zoom = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub dataset: DatasetConfig,
    pub theme: ThemeMode,
    /// Wait for the host view to become visible before initializing.
    pub deferred: bool,
    pub view: ViewOptions,
    pub palette: StylePalette,
    pub countries_api: String,
    pub weather_api: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            theme: ThemeMode::default(),
            deferred: false,
            view: ViewOptions::default(),
            palette: StylePalette::default(),
            countries_api: COUNTRIES_API_URL.to_string(),
            weather_api: WEATHER_API_URL.to_string(),
        }
    }
}

impl MapConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: MapConfig = toml::from_str(s)?;
        config.palette.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MapError::NotFound(format!("config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}
