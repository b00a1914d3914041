// crates/worldmap-core/src/layer/mod.rs

//! # Interactive Region Layer
//!
//! Draws every dataset feature as a region on a [`MapSurface`] and keeps
//! each region's visual state:
//!
//! - hover: highlighted style, raised above its siblings
//! - unhover: normal style restored exactly (no-op if already normal)
//! - click: resolved into a [`RegionSelection`]

mod style;
mod surface;

pub use style::{RegionStyle, StylePalette, TileLayer};
pub use surface::{HeadlessSurface, MapSurface, PaintedRegion, RegionId};

use crate::config::{ThemeMode, ViewOptions};
use crate::error::{MapError, Result};
use crate::model::{Dataset, GeoFeature, RegionSelection};
use crate::resolve::SelectionResolver;

/// Interaction reported by the surface's host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEvent {
    Hover(RegionId),
    Unhover(RegionId),
    Click(RegionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Normal,
    Hovered,
}

#[derive(Debug, Clone)]
struct Region {
    feature: GeoFeature,
    state: RegionState,
}

pub struct RegionLayer<S> {
    surface: S,
    palette: StylePalette,
    resolver: SelectionResolver,
    regions: Vec<Region>,
}

impl<S: MapSurface> RegionLayer<S> {
    pub fn new(surface: S, palette: StylePalette, resolver: SelectionResolver) -> Self {
        Self {
            surface,
            palette,
            resolver,
            regions: Vec::new(),
        }
    }

    /// Initializes the underlying surface with the tiles of `theme`.
    pub fn initialize(&mut self, view: &ViewOptions, theme: ThemeMode) -> Result<()> {
        self.surface.initialize(view, &TileLayer::for_theme(theme))
    }

    /// Adds one region per feature. Returns the number of regions drawn.
    ///
    /// Runs once per surface: the trait has no way to take single regions
    /// back, so a second call is refused. If the surface rejects a region
    /// partway, the layer forgets every region of this dataset and reports
    /// the error.
    pub fn render(&mut self, dataset: Dataset) -> Result<usize> {
        if !self.regions.is_empty() {
            return Err(MapError::Surface("regions already rendered".into()));
        }
        for (id, feature) in dataset.into_features().into_iter().enumerate() {
            let tooltip = self.resolver.name_of(&feature);
            if let Err(e) = self
                .surface
                .add_region(id, &feature, &self.palette.normal, &tooltip)
            {
                self.regions.clear();
                return Err(e);
            }
            self.regions.push(Region {
                feature,
                state: RegionState::Normal,
            });
        }
        Ok(self.regions.len())
    }

    pub fn handle(&mut self, event: RegionEvent) -> Option<RegionSelection> {
        match event {
            RegionEvent::Hover(id) => {
                self.hover(id);
                None
            }
            RegionEvent::Unhover(id) => {
                self.unhover(id);
                None
            }
            RegionEvent::Click(id) => self.click(id),
        }
    }

    pub fn hover(&mut self, id: RegionId) {
        let Some(region) = self.regions.get_mut(id) else {
            log::debug!("hover on unknown region {id}");
            return;
        };
        if region.state == RegionState::Normal {
            self.surface.set_region_style(id, &self.palette.highlighted);
            region.state = RegionState::Hovered;
        }
        self.surface.bring_to_front(id);
    }

    pub fn unhover(&mut self, id: RegionId) {
        let Some(region) = self.regions.get_mut(id) else {
            log::debug!("unhover on unknown region {id}");
            return;
        };
        if region.state == RegionState::Hovered {
            self.surface.set_region_style(id, &self.palette.normal);
            region.state = RegionState::Normal;
        }
    }

    pub fn click(&mut self, id: RegionId) -> Option<RegionSelection> {
        match self.regions.get(id) {
            Some(region) => Some(self.resolver.resolve(&region.feature)),
            None => {
                log::debug!("click on unknown region {id}");
                None
            }
        }
    }

    pub fn state(&self, id: RegionId) -> Option<RegionState> {
        self.regions.get(id).map(|r| r.state)
    }

    pub fn feature(&self, id: RegionId) -> Option<&GeoFeature> {
        self.regions.get(id).map(|r| &r.feature)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region ids with their resolved display names, in dataset order.
    pub fn names(&self) -> impl Iterator<Item = (RegionId, String)> + '_ {
        self.regions
            .iter()
            .enumerate()
            .map(|(id, r)| (id, self.resolver.name_of(&r.feature)))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn remove(&mut self) {
        self.regions.clear();
        self.surface.remove_self();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(names: &[&str]) -> Dataset {
        Dataset::new(
            names
                .iter()
                .map(|n| GeoFeature {
                    bbox: None,
                    geometry: None,
                    id: None,
                    properties: json!({ "ADMIN": n }).as_object().cloned(),
                    foreign_members: None,
                })
                .collect(),
        )
    }

    fn layer(names: &[&str]) -> RegionLayer<HeadlessSurface> {
        let mut layer = RegionLayer::new(
            HeadlessSurface::new(),
            StylePalette::default(),
            SelectionResolver::default(),
        );
        layer
            .initialize(&ViewOptions::default(), ThemeMode::Light)
            .unwrap();
        layer.render(dataset(names)).unwrap();
        layer
    }

    #[test]
    fn regions_start_with_the_normal_style_and_a_tooltip() {
        let layer = layer(&["France", "Spain"]);
        assert_eq!(layer.len(), 2);
        let painted = layer.surface().region(1).unwrap();
        assert_eq!(painted.tooltip, "Spain");
        assert_eq!(painted.style, RegionStyle::normal());
    }

    #[test]
    fn hover_then_unhover_restores_the_exact_style() {
        let mut layer = layer(&["France", "Spain"]);
        let before = layer.surface().region(0).unwrap().style.clone();

        layer.hover(0);
        assert_eq!(layer.state(0), Some(RegionState::Hovered));
        assert_eq!(
            layer.surface().region(0).unwrap().style,
            RegionStyle::highlighted()
        );
        assert_eq!(layer.surface().topmost(), Some(0));

        layer.unhover(0);
        assert_eq!(layer.surface().region(0).unwrap().style, before);
        assert_eq!(layer.state(0), Some(RegionState::Normal));
    }

    #[test]
    fn unhover_is_idempotent() {
        let mut layer = layer(&["France"]);
        layer.unhover(0);
        layer.unhover(0);
        assert_eq!(
            layer.surface().region(0).unwrap().style,
            RegionStyle::normal()
        );
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut layer = layer(&["France"]);
        layer.hover(7);
        layer.unhover(7);
        assert_eq!(layer.click(7), None);
        assert_eq!(layer.handle(RegionEvent::Hover(9)), None);
    }

    #[test]
    fn click_resolves_the_feature() {
        let mut layer = layer(&["France", "Spain"]);
        let sel = layer.handle(RegionEvent::Click(1)).unwrap();
        assert_eq!(sel.name, "Spain");
        assert_eq!(sel.code, "");
    }

    /// Accepts `limit` regions, then rejects the rest.
    struct FullSurface {
        inner: HeadlessSurface,
        limit: usize,
    }

    impl MapSurface for FullSurface {
        fn initialize(&mut self, view: &ViewOptions, tiles: &TileLayer) -> Result<()> {
            self.inner.initialize(view, tiles)
        }
        fn add_region(
            &mut self,
            id: RegionId,
            feature: &GeoFeature,
            style: &RegionStyle,
            tooltip: &str,
        ) -> Result<()> {
            if self.inner.region_count() >= self.limit {
                return Err(MapError::Surface("layer limit reached".into()));
            }
            self.inner.add_region(id, feature, style, tooltip)
        }
        fn set_region_style(&mut self, id: RegionId, style: &RegionStyle) {
            self.inner.set_region_style(id, style)
        }
        fn bring_to_front(&mut self, id: RegionId) {
            self.inner.bring_to_front(id)
        }
        fn remove_self(&mut self) {
            self.inner.remove_self()
        }
    }

    #[test]
    fn failed_render_leaves_no_interactive_regions() {
        let surface = FullSurface {
            inner: HeadlessSurface::new(),
            limit: 1,
        };
        let mut layer =
            RegionLayer::new(surface, StylePalette::default(), SelectionResolver::default());
        layer
            .initialize(&ViewOptions::default(), ThemeMode::Light)
            .unwrap();

        let err = layer.render(dataset(&["France", "Spain", "Italy"])).unwrap_err();
        assert!(matches!(err, MapError::Surface(_)));
        assert!(layer.is_empty());
        assert_eq!(layer.click(0), None);
    }

    #[test]
    fn second_render_is_refused() {
        let mut layer = layer(&["France"]);
        assert!(layer.render(dataset(&["Spain", "Italy"])).is_err());
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.surface().region_count(), 1);
        assert_eq!(layer.surface().region(0).unwrap().tooltip, "France");
    }

    #[test]
    fn remove_detaches_the_surface() {
        let mut layer = layer(&["France"]);
        layer.remove();
        assert!(layer.is_empty());
        assert!(layer.surface().is_removed());
    }
}
