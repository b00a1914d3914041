//! Degraded dataset loading
//!
//! This example demonstrates how the map behaves when things go wrong:
//! - The primary dataset URL fails and the fallback is used (and cached
//!   under its own key)
//! - Both sources fail and the map stays empty with loading cleared
//! - Deferred initialization waits for visibility and runs only once
//! - The key-value tier rejects a write over its quota, silently

use std::cell::Cell;
use std::rc::Rc;
use worldmap_core::prelude::*;

const FALLBACK_ONLY: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","id":"ISL","properties":{"name":"Iceland"},
   "geometry":{"type":"Polygon","coordinates":[[[-24,63],[-13,63],[-13,67],[-24,67],[-24,63]]]}}
]}"#;

/// Fails the primary URL; answers the fallback unless `offline`.
struct FlakyFetcher {
    primary: String,
    offline: bool,
}

impl HttpFetch for FlakyFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if self.offline || url == self.primary {
            return Err(MapError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(FALLBACK_ONLY.to_string())
    }
}

/// Logs disconnects like an `IntersectionObserver` would stop firing.
struct PrintingObserver {
    disconnects: Rc<Cell<usize>>,
}

impl VisibilityObserver for PrintingObserver {
    fn disconnect(&mut self) {
        self.disconnects.set(self.disconnects.get() + 1);
        println!("  (observer disconnected)");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== worldmap: degraded loading ===\n");

    let config = MapConfig {
        deferred: true,
        ..MapConfig::default()
    };
    let primary = config.dataset.primary.url.clone();

    // Example 1: primary down, fallback up; no structured cache available
    println!("--- Example 1: Fallback dataset ---");
    let loader = DatasetLoader::new(
        FlakyFetcher {
            primary: primary.clone(),
            offline: false,
        },
        NoResponseCache,
        MemoryStore::with_quota(64 * 1024),
    );
    let disconnects = Rc::new(Cell::new(0));
    let mut map = WorldMap::with_observer(
        config.clone(),
        HeadlessSurface::new(),
        PrintingObserver {
            disconnects: Rc::clone(&disconnects),
        },
    );
    println!("Mounted, state: {:?}", map.state());
    map.on_visibility_changed(false, &loader).await?;
    println!("Hidden, state: {:?}", map.state());
    let drawn = map.on_visibility_changed(true, &loader).await?;
    println!("Visible, state: {:?}, regions: {drawn}", map.state());
    map.on_visibility_changed(true, &loader).await?;
    println!("Initializations: {}, disconnects: {}", map.surface().initializations(), disconnects.get());
    println!(
        "Stored under fallback key: {}",
        loader.store().contains(&config.dataset.fallback.cache_key)
    );
    if let Some(selection) = map.click(0) {
        println!("Clicked: {} [{}] at {}", selection.name, selection.code, selection.coordinates);
    }
    println!();

    // Example 2: everything offline
    println!("--- Example 2: Both sources down ---");
    let offline = DatasetLoader::new(
        FlakyFetcher {
            primary,
            offline: true,
        },
        MemoryResponseCache::new(),
        MemoryStore::new(),
    );
    let mut empty = WorldMap::new(MapConfig::default(), HeadlessSurface::new());
    let drawn = empty.mount(&offline).await?;
    println!("Regions: {drawn}, loading: {}", empty.is_loading());
    println!();

    // Example 3: quota
    println!("--- Example 3: Storage quota ---");
    let tiny = MemoryStore::with_quota(16);
    match tiny.set("worldmap:countries.geojson", FALLBACK_ONLY) {
        Ok(()) => println!("stored"),
        Err(e) => println!("Rejected as expected: {e}"),
    }

    // Example 4: destroy while pending
    println!("\n--- Example 4: Destroy before visible ---");
    let pending_disconnects = Rc::new(Cell::new(0));
    let mut pending = WorldMap::with_observer(
        config,
        HeadlessSurface::new(),
        PrintingObserver {
            disconnects: Rc::clone(&pending_disconnects),
        },
    );
    pending.destroy();
    pending.destroy();
    println!("Disconnects: {}, surface removed: {}", pending_disconnects.get(), pending.surface().is_removed());

    map.destroy();
    println!("\n✓ Done");
    Ok(())
}
