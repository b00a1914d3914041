// crates/worldmap-core/src/model.rs
use crate::error::{MapError, Result};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One country boundary as it comes from the dataset.
///
/// The property bag is not uniform across dataset sources; read it through
/// [`crate::extract::ExtractorChain`].
pub type GeoFeature = Feature;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const ORIGIN: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The REST payloads use `0` for "unknown", so do we.
    pub fn is_origin(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// The identity of a clicked region, handed to selection listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSelection {
    pub name: String,
    /// Uppercased ISO-style code; empty when the feature carries none.
    pub code: String,
    pub coordinates: Coordinates,
}

/// Where a dataset comes from and the key it is cached under in the
/// key-value tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub url: String,
    pub cache_key: String,
}

impl DatasetSource {
    pub fn new(url: impl Into<String>, cache_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_key: cache_key.into(),
        }
    }
}

/// A raw dataset payload plus the key it was stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDataset {
    pub key: String,
    pub payload: String,
}

/// A parsed country-boundary dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    features: Vec<GeoFeature>,
}

impl Dataset {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON text. Only feature collections are accepted.
    pub fn parse(payload: &str) -> Result<Self> {
        match payload.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => Ok(Self::from(fc)),
            GeoJson::Feature(_) => Err(MapError::InvalidData(
                "expected a FeatureCollection, got a single Feature".into(),
            )),
            GeoJson::Geometry(_) => Err(MapError::InvalidData(
                "expected a FeatureCollection, got a bare Geometry".into(),
            )),
        }
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_features(self) -> Vec<GeoFeature> {
        self.features
    }
}

impl From<FeatureCollection> for Dataset {
    fn from(fc: FeatureCollection) -> Self {
        Self::new(fc.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collections_only() {
        let fc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"A"},"geometry":null}
        ]}"#;
        let ds = Dataset::parse(fc).unwrap();
        assert_eq!(ds.len(), 1);

        let single = r#"{"type":"Feature","properties":{},"geometry":null}"#;
        assert!(matches!(
            Dataset::parse(single),
            Err(MapError::InvalidData(_))
        ));
        assert!(Dataset::parse("not json").is_err());
    }

    #[test]
    fn origin_detection() {
        assert!(Coordinates::ORIGIN.is_origin());
        assert!(!Coordinates::new(46.0, 2.0).is_origin());
    }
}
