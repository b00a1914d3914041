// crates/worldmap-core/src/resolve.rs
use crate::extract::ExtractorChain;
use crate::model::{Coordinates, GeoFeature, RegionSelection};
use geo::BoundingRect;

/// Name used when no name extractor matches.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Turns a clicked feature into a [`RegionSelection`].
///
/// Never fails: a feature without any known key resolves to
/// `("Unknown", "", (0, 0))`.
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    names: ExtractorChain,
    codes: ExtractorChain,
}

impl Default for SelectionResolver {
    fn default() -> Self {
        Self::new(ExtractorChain::names(), ExtractorChain::codes())
    }
}

impl SelectionResolver {
    pub fn new(names: ExtractorChain, codes: ExtractorChain) -> Self {
        Self { names, codes }
    }

    pub fn resolve(&self, feature: &GeoFeature) -> RegionSelection {
        RegionSelection {
            name: self.name_of(feature),
            code: self.code_of(feature),
            coordinates: center_of(feature),
        }
    }

    pub fn name_of(&self, feature: &GeoFeature) -> String {
        self.names
            .value(feature)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn code_of(&self, feature: &GeoFeature) -> String {
        self.codes
            .value(feature)
            .map(|c| c.to_uppercase())
            .unwrap_or_default()
    }
}

/// Center of the feature's bounding rectangle.
///
/// Not guaranteed to fall inside concave or multi-part shapes.
pub fn center_of(feature: &GeoFeature) -> Coordinates {
    let Some(geometry) = feature.geometry.as_ref() else {
        return Coordinates::ORIGIN;
    };

    let shape: geo::Geometry<f64> = match geometry.value.clone().try_into() {
        Ok(g) => g,
        Err(e) => {
            log::debug!("unconvertible geometry, using origin: {e}");
            return Coordinates::ORIGIN;
        }
    };

    match shape.bounding_rect() {
        Some(rect) => {
            let c = rect.center();
            Coordinates::new(c.y, c.x)
        }
        None => Coordinates::ORIGIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value};
    use serde_json::json;

    fn feature(props: serde_json::Value, geometry: Option<Geometry>) -> GeoFeature {
        GeoFeature {
            bbox: None,
            geometry,
            id: None,
            properties: props.as_object().cloned(),
            foreign_members: None,
        }
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![x0, y0],
            vec![x1, y0],
            vec![x1, y1],
            vec![x0, y1],
            vec![x0, y0],
        ]]))
    }

    #[test]
    fn unknown_when_no_name_key() {
        let r = SelectionResolver::default();
        let sel = r.resolve(&feature(json!({"pop": 12, "NAME_LONG": "x"}), None));
        assert_eq!(sel.name, UNKNOWN_NAME);
        assert_eq!(sel.code, "");
        assert_eq!(sel.coordinates, Coordinates::ORIGIN);
    }

    #[test]
    fn three_letter_code_wins_in_any_casing() {
        let r = SelectionResolver::default();
        for key in ["ISO_A3", "iso_a3", "ISO3166-1-Alpha-3"] {
            let mut props = json!({"ADMIN": "France", "ISO_A2": "FR", "iso_a2": "fr"});
            props[key] = json!("fra");
            let sel = r.resolve(&feature(props, None));
            assert_eq!(sel.code, "FRA", "key {key}");
        }
    }

    #[test]
    fn two_letter_code_is_uppercased() {
        let r = SelectionResolver::default();
        let sel = r.resolve(&feature(json!({"name": "Chile", "iso_a2": "cl"}), None));
        assert_eq!(sel.code, "CL");
        assert_eq!(sel.name, "Chile");
    }

    #[test]
    fn center_of_bounding_box() {
        let r = SelectionResolver::default();
        let sel = r.resolve(&feature(
            json!({"ADMIN": "Box"}),
            Some(square(-10.0, 40.0, 10.0, 50.0)),
        ));
        assert_eq!(sel.coordinates, Coordinates::new(45.0, 0.0));
    }

    #[test]
    fn center_spans_every_part_of_a_multipolygon() {
        let geometry = Geometry::new(Value::MultiPolygon(vec![
            vec![vec![
                vec![0.0, 0.0],
                vec![2.0, 0.0],
                vec![2.0, 2.0],
                vec![0.0, 0.0],
            ]],
            vec![vec![
                vec![8.0, 8.0],
                vec![10.0, 8.0],
                vec![10.0, 10.0],
                vec![8.0, 8.0],
            ]],
        ]));
        let c = center_of(&feature(json!({}), Some(geometry)));
        assert_eq!(c, Coordinates::new(5.0, 5.0));
    }

    #[test]
    fn empty_geometry_falls_back_to_origin() {
        let empty = Geometry::new(Value::MultiPolygon(vec![]));
        assert_eq!(
            center_of(&feature(json!({}), Some(empty))),
            Coordinates::ORIGIN
        );
    }
}
