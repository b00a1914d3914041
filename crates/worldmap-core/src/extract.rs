// crates/worldmap-core/src/extract.rs

//! # Property Extractors
//!
//! Country-boundary datasets disagree on property names: Natural Earth derived
//! files use `ADMIN` / `ISO_A3`, the `datasets/geo-countries` export uses
//! `name` / `ISO3166-1-Alpha-3`, and `world.geo.json` keeps its code in the
//! feature `id`. Instead of probing keys ad hoc, each lookup is an ordered
//! [`ExtractorChain`] whose first successful [`Extractor`] wins.
//!
//! The chains are plain data, so they can be inspected, reordered and tested
//! without a map surface.

use crate::model::GeoFeature;
use geojson::feature::Id;
use serde_json::Value;

/// Natural Earth writes `-99` where a code is not assigned.
const UNASSIGNED_CODE: &str = "-99";

/// Where an extractor reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A key in the feature's `properties` bag.
    Property(&'static str),
    /// The feature-level `id` member.
    FeatureId,
}

/// One named way of reading a value from a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extractor {
    pub label: &'static str,
    pub source: Source,
}

impl Extractor {
    pub const fn property(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            source: Source::Property(key),
        }
    }

    pub const fn feature_id(label: &'static str) -> Self {
        Self {
            label,
            source: Source::FeatureId,
        }
    }

    /// Reads a non-blank value. Strings and numbers are accepted.
    pub fn extract(&self, feature: &GeoFeature) -> Option<String> {
        let raw = match self.source {
            Source::Property(key) => feature
                .properties
                .as_ref()
                .and_then(|props| props.get(key))
                .and_then(scalar_to_string),
            Source::FeatureId => feature.id.as_ref().map(|id| match id {
                Id::String(s) => s.clone(),
                Id::Number(n) => n.to_string(),
            }),
        }?;

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == UNASSIGNED_CODE {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ordered list of extractors. The first one that yields a value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorChain {
    extractors: Vec<Extractor>,
}

/// A value together with the extractor that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub label: &'static str,
    pub value: String,
}

impl ExtractorChain {
    pub fn new(extractors: Vec<Extractor>) -> Self {
        Self { extractors }
    }

    /// Display-name lookup: admin name, generic name, upper-case name.
    pub fn names() -> Self {
        Self::new(vec![
            Extractor::property("admin-name", "ADMIN"),
            Extractor::property("name", "name"),
            Extractor::property("upper-name", "NAME"),
        ])
    }

    /// Code lookup: every three-letter variant before any two-letter one,
    /// then the feature id as a last resort.
    pub fn codes() -> Self {
        Self::new(vec![
            Extractor::property("iso-a3", "ISO_A3"),
            Extractor::property("iso-a3-lower", "iso_a3"),
            Extractor::property("iso3166-alpha3", "ISO3166-1-Alpha-3"),
            Extractor::property("iso-a2", "ISO_A2"),
            Extractor::property("iso-a2-lower", "iso_a2"),
            Extractor::property("iso3166-alpha2", "ISO3166-1-Alpha-2"),
            Extractor::feature_id("feature-id"),
        ])
    }

    pub fn extractors(&self) -> &[Extractor] {
        &self.extractors
    }

    pub fn first_match(&self, feature: &GeoFeature) -> Option<Extracted> {
        self.extractors.iter().find_map(|ex| {
            ex.extract(feature).map(|value| Extracted {
                label: ex.label,
                value,
            })
        })
    }

    pub fn value(&self, feature: &GeoFeature) -> Option<String> {
        self.first_match(feature).map(|e| e.value)
    }
}
