// crates/worldmap-core/src/layer/style.rs
use crate::config::ThemeMode;
use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Paint attributes of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStyle {
    pub fill_color: String,
    pub stroke_color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl RegionStyle {
    pub fn normal() -> Self {
        Self {
            fill_color: "#60a5fa".into(),
            stroke_color: "#93c5fd".into(),
            weight: 1.5,
            opacity: 1.0,
            fill_opacity: 0.65,
        }
    }

    pub fn highlighted() -> Self {
        Self {
            fill_color: "#fde047".into(),
            stroke_color: "#f59e0b".into(),
            weight: 2.5,
            opacity: 1.0,
            fill_opacity: 0.85,
        }
    }
}

/// The two styles a region alternates between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub normal: RegionStyle,
    pub highlighted: RegionStyle,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            normal: RegionStyle::normal(),
            highlighted: RegionStyle::highlighted(),
        }
    }
}

impl StylePalette {
    /// Hovering must be visible.
    pub fn validate(&self) -> Result<()> {
        if self.normal == self.highlighted {
            return Err(MapError::InvalidData(
                "normal and highlighted region styles must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Background tile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub subdomains: String,
    pub max_zoom: u8,
}

const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OSM</a> &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

impl TileLayer {
    pub fn for_theme(theme: ThemeMode) -> Self {
        let flavor = match theme {
            ThemeMode::Light => "light_all",
            ThemeMode::Dark => "dark_all",
        };
        Self {
            url_template: format!("https://{{s}}.basemaps.cartocdn.com/{flavor}/{{z}}/{{x}}/{{y}}{{r}}.png"),
            attribution: CARTO_ATTRIBUTION.to_string(),
            subdomains: "abcd".to_string(),
            max_zoom: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_is_valid() {
        StylePalette::default().validate().unwrap();
    }

    #[test]
    fn tiles_follow_theme() {
        assert!(TileLayer::for_theme(ThemeMode::Dark)
            .url_template
            .contains("/dark_all/{z}/{x}/{y}{r}.png"));
        assert!(TileLayer::for_theme(ThemeMode::Light)
            .url_template
            .contains("/light_all/"));
    }
}
