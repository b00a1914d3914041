// crates/worldmap-core/src/error.rs

//! Error type shared by every component of the selection pipeline.
//!
//! Most failures never reach a caller: the dataset loader falls back to a
//! second source, cache writes are best-effort and the country match
//! degrades to "no match". The variants below surface when a caller asks for
//! the underlying reason.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    #[cfg(feature = "http")]
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("storage quota exceeded for key '{key}' ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("dataset unavailable (primary: {primary}; fallback: {fallback})")]
    DatasetUnavailable { primary: String, fallback: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("map surface error: {0}")]
    Surface(String),

    #[cfg(feature = "disk-cache")]
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl MapError {
    /// `true` for an HTTP 404, which the REST clients read as "no such entity".
    pub fn is_not_found_status(&self) -> bool {
        matches!(self, MapError::Status { status: 404, .. })
    }
}

impl From<geojson::Error> for MapError {
    fn from(e: geojson::Error) -> Self {
        MapError::GeoJson(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
