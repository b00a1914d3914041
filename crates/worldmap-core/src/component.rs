// crates/worldmap-core/src/component.rs

//! # Map Component
//!
//! Ties the pipeline to the lifecycle of the view hosting the map:
//!
//! 1. **Mount**: in eager mode, initialize right away. In deferred mode,
//!    wait for [`WorldMap::notify_visibility`].
//! 2. **Initialize**: split in three so a host can keep the component
//!    borrowable while the dataset is in flight:
//!    [`begin`](WorldMap::begin_mount) (surface + loading flag),
//!    the dataset load (any [`LoadDataset`]), and
//!    [`WorldMap::finish_initialize`] (render, or degrade to an empty map).
//!    [`WorldMap::mount`] and [`WorldMap::on_visibility_changed`] chain the
//!    three for hosts that can simply `await`.
//! 3. **Interact**: hover/unhover/click; a click is resolved and emitted.
//! 4. **Destroy**: disconnects a pending observer and removes the surface.

use crate::config::MapConfig;
use crate::dataset::LoadDataset;
use crate::deferred::{DeferredInit, InitState, NoObserver, VisibilityObserver};
use crate::emitter::{ListenerId, SelectionEmitter};
use crate::error::Result;
use crate::layer::{MapSurface, RegionEvent, RegionId, RegionLayer};
use crate::model::{Dataset, DatasetSource, RegionSelection};
use crate::resolve::SelectionResolver;

/// The two sources a started initialization must load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub primary: DatasetSource,
    pub fallback: DatasetSource,
}

pub struct WorldMap<S, O = NoObserver> {
    config: MapConfig,
    layer: RegionLayer<S>,
    emitter: SelectionEmitter,
    init: DeferredInit,
    observer: Option<O>,
    loading: bool,
    destroyed: bool,
}

impl<S: MapSurface> WorldMap<S, NoObserver> {
    pub fn new(config: MapConfig, surface: S) -> Self {
        Self::build(config, surface, None)
    }
}

impl<S: MapSurface, O: VisibilityObserver> WorldMap<S, O> {
    /// A component whose deferred initialization is driven by `observer`.
    pub fn with_observer(config: MapConfig, surface: S, observer: O) -> Self {
        Self::build(config, surface, Some(observer))
    }

    fn build(config: MapConfig, surface: S, observer: Option<O>) -> Self {
        let layer = RegionLayer::new(
            surface,
            config.palette.clone(),
            SelectionResolver::default(),
        );
        Self {
            config,
            layer,
            emitter: SelectionEmitter::new(),
            init: DeferredInit::new(),
            observer,
            loading: true,
            destroyed: false,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// `true` until the first initialization has finished, successfully or
    /// not.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn state(&self) -> InitState {
        self.init.state()
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub fn layer(&self) -> &RegionLayer<S> {
        &self.layer
    }

    pub fn surface(&self) -> &S {
        self.layer.surface()
    }

    // -------------------------------------------------------------------------
    // LIFECYCLE
    // -------------------------------------------------------------------------

    /// Eager start. `None` in deferred mode or if already started.
    pub fn begin_mount(&mut self) -> Result<Option<LoadRequest>> {
        if self.destroyed || self.config.deferred {
            return Ok(None);
        }
        if !self.init.force() {
            return Ok(None);
        }
        self.start().map(Some)
    }

    /// Deferred start. `Some` only for the first visible signal.
    pub fn notify_visibility(&mut self, visible: bool) -> Result<Option<LoadRequest>> {
        if self.destroyed {
            return Ok(None);
        }
        if !self.init.on_visibility(visible) {
            return Ok(None);
        }
        self.start().map(Some)
    }

    fn start(&mut self) -> Result<LoadRequest> {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        self.loading = true;
        if let Err(e) = self.layer.initialize(&self.config.view, self.config.theme) {
            self.loading = false;
            return Err(e);
        }
        Ok(LoadRequest {
            primary: self.config.dataset.primary.clone(),
            fallback: self.config.dataset.fallback.clone(),
        })
    }

    /// Renders the loaded dataset, or leaves the map empty if loading failed.
    /// Returns the number of regions drawn.
    pub fn finish_initialize(&mut self, loaded: Result<Dataset>) -> usize {
        self.loading = false;
        if self.destroyed {
            log::debug!("map destroyed while loading; discarding dataset");
            return 0;
        }
        let dataset = match loaded {
            Ok(ds) => ds,
            Err(e) => {
                log::warn!("no dataset available, showing an empty map: {e}");
                return 0;
            }
        };
        match self.layer.render(dataset) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("rendering regions failed: {e}");
                0
            }
        }
    }

    pub async fn mount<L: LoadDataset>(&mut self, loader: &L) -> Result<usize> {
        match self.begin_mount()? {
            Some(request) => Ok(self.complete(request, loader).await),
            None => Ok(0),
        }
    }

    pub async fn on_visibility_changed<L: LoadDataset>(
        &mut self,
        visible: bool,
        loader: &L,
    ) -> Result<usize> {
        match self.notify_visibility(visible)? {
            Some(request) => Ok(self.complete(request, loader).await),
            None => Ok(0),
        }
    }

    async fn complete<L: LoadDataset>(&mut self, request: LoadRequest, loader: &L) -> usize {
        let loaded = loader.load(&request.primary, &request.fallback).await;
        self.finish_initialize(loaded)
    }

    /// Tears the view down. Safe to call at any point, and more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        if self.init.state() == InitState::Initialized {
            self.layer.remove();
        }
    }

    // -------------------------------------------------------------------------
    // INTERACTION
    // -------------------------------------------------------------------------

    pub fn handle(&mut self, event: RegionEvent) -> Option<RegionSelection> {
        if self.destroyed {
            return None;
        }
        let selection = self.layer.handle(event)?;
        self.emitter.emit(&selection);
        Some(selection)
    }

    pub fn hover(&mut self, id: RegionId) {
        self.handle(RegionEvent::Hover(id));
    }

    pub fn unhover(&mut self, id: RegionId) {
        self.handle(RegionEvent::Unhover(id));
    }

    pub fn click(&mut self, id: RegionId) -> Option<RegionSelection> {
        self.handle(RegionEvent::Click(id))
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&RegionSelection) + 'static,
    {
        self.emitter.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.emitter.unsubscribe(id)
    }
}
