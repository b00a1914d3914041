// crates/worldmap-core/src/layer/surface.rs
use super::style::{RegionStyle, TileLayer};
use crate::config::ViewOptions;
use crate::error::{MapError, Result};
use crate::model::GeoFeature;
use std::collections::HashMap;

/// Index of a region inside its layer, stable for the lifetime of one
/// rendered dataset.
pub type RegionId = usize;

/// The narrow slice of a mapping library the region layer drives.
///
/// Interaction flows the other way: whoever owns the concrete surface reports
/// hover/unhover/click on a region id back to
/// [`crate::layer::RegionLayer::handle`].
pub trait MapSurface {
    /// Builds the pan/zoom surface and its background tiles. Called once.
    fn initialize(&mut self, view: &ViewOptions, tiles: &TileLayer) -> Result<()>;

    fn add_region(
        &mut self,
        id: RegionId,
        feature: &GeoFeature,
        style: &RegionStyle,
        tooltip: &str,
    ) -> Result<()>;

    fn set_region_style(&mut self, id: RegionId, style: &RegionStyle);

    /// Raises the region above its siblings in paint order.
    fn bring_to_front(&mut self, id: RegionId);

    /// Detaches the surface from its host and drops its resources.
    fn remove_self(&mut self);
}

impl<T: MapSurface + ?Sized> MapSurface for Box<T> {
    fn initialize(&mut self, view: &ViewOptions, tiles: &TileLayer) -> Result<()> {
        (**self).initialize(view, tiles)
    }
    fn add_region(
        &mut self,
        id: RegionId,
        feature: &GeoFeature,
        style: &RegionStyle,
        tooltip: &str,
    ) -> Result<()> {
        (**self).add_region(id, feature, style, tooltip)
    }
    fn set_region_style(&mut self, id: RegionId, style: &RegionStyle) {
        (**self).set_region_style(id, style)
    }
    fn bring_to_front(&mut self, id: RegionId) {
        (**self).bring_to_front(id)
    }
    fn remove_self(&mut self) {
        (**self).remove_self()
    }
}

// -----------------------------------------------------------------------------
// HEADLESS SURFACE
// -----------------------------------------------------------------------------

/// What a [`HeadlessSurface`] knows about one region.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedRegion {
    pub tooltip: String,
    pub style: RegionStyle,
}

/// An in-memory surface: keeps styles and paint order instead of drawing.
///
/// Used by the CLI and the demos, and handy in tests because every call the
/// layer makes is observable.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    view: Option<ViewOptions>,
    tiles: Option<TileLayer>,
    regions: HashMap<RegionId, PaintedRegion>,
    paint_order: Vec<RegionId>,
    initializations: usize,
    removed: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    pub fn initializations(&self) -> usize {
        self.initializations
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn view(&self) -> Option<&ViewOptions> {
        self.view.as_ref()
    }

    pub fn tiles(&self) -> Option<&TileLayer> {
        self.tiles.as_ref()
    }

    pub fn region(&self, id: RegionId) -> Option<&PaintedRegion> {
        self.regions.get(&id)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Bottom to top.
    pub fn paint_order(&self) -> &[RegionId] {
        &self.paint_order
    }

    pub fn topmost(&self) -> Option<RegionId> {
        self.paint_order.last().copied()
    }
}

impl MapSurface for HeadlessSurface {
    fn initialize(&mut self, view: &ViewOptions, tiles: &TileLayer) -> Result<()> {
        if self.removed {
            return Err(MapError::Surface("surface already removed".into()));
        }
        self.view = Some(view.clone());
        self.tiles = Some(tiles.clone());
        self.initializations += 1;
        Ok(())
    }

    fn add_region(
        &mut self,
        id: RegionId,
        _feature: &GeoFeature,
        style: &RegionStyle,
        tooltip: &str,
    ) -> Result<()> {
        if !self.is_initialized() {
            return Err(MapError::Surface("add_region before initialize".into()));
        }
        self.regions.insert(
            id,
            PaintedRegion {
                tooltip: tooltip.to_string(),
                style: style.clone(),
            },
        );
        self.paint_order.retain(|r| *r != id);
        self.paint_order.push(id);
        Ok(())
    }

    fn set_region_style(&mut self, id: RegionId, style: &RegionStyle) {
        if let Some(region) = self.regions.get_mut(&id) {
            region.style = style.clone();
        }
    }

    fn bring_to_front(&mut self, id: RegionId) {
        if let Some(pos) = self.paint_order.iter().position(|r| *r == id) {
            let id = self.paint_order.remove(pos);
            self.paint_order.push(id);
        }
    }

    fn remove_self(&mut self) {
        self.regions.clear();
        self.paint_order.clear();
        self.view = None;
        self.tiles = None;
        self.removed = true;
    }
}
