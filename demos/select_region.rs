//! End-to-end selection on a headless map
//!
//! This example demonstrates how to:
//! - Load the boundary dataset through the session cache
//! - Mount a map component and draw one region per country
//! - Hover, unhover and click a region
//! - Hydrate the emitted selection with country details and weather
//!
//! Everything runs against in-memory stand-ins, so no network is needed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use worldmap_core::prelude::*;
use worldmap_core::weather::Weather;

const COUNTRIES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"ADMIN":"France","ISO_A3":"FRA"},
   "geometry":{"type":"Polygon","coordinates":[[[-5,42],[8,42],[8,51],[-5,51],[-5,42]]]}},
  {"type":"Feature","properties":{"ADMIN":"Norway","ISO_A3":"-99","ISO_A2":"NO"},
   "geometry":{"type":"Polygon","coordinates":[[[4,58],[31,58],[31,71],[4,71],[4,58]]]}},
  {"type":"Feature","properties":{"name":"Peru","iso_a3":"per"},
   "geometry":{"type":"Polygon","coordinates":[[[-81,-18],[-69,-18],[-69,0],[-81,0],[-81,-18]]]}}
]}"#;

/// Serves the dataset and counts requests.
#[derive(Default)]
struct DemoFetcher {
    requests: Cell<usize>,
}

impl HttpFetch for DemoFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        self.requests.set(self.requests.get() + 1);
        Ok(COUNTRIES.to_string())
    }
}

struct DemoDirectory;

impl CountryDirectory for DemoDirectory {
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
        let record = match code {
            "FRA" => CountryRecord {
                capitals: vec!["Paris".into()],
                population: 67_391_582,
                latitude: 46.0,
                longitude: 2.0,
                ..CountryRecord::named("FRA", "France")
            },
            _ => return Ok(None),
        };
        Ok(Some(record))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        Ok(match name {
            "Norway" => vec![CountryRecord {
                capitals: vec!["Oslo".into()],
                population: 5_379_475,
                latitude: 62.0,
                longitude: 10.0,
                ..CountryRecord::named("NOR", "Norway")
            }],
            _ => Vec::new(),
        })
    }
}

struct FixedWeather;

impl WeatherSource for FixedWeather {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather> {
        Ok(Weather {
            temperature: (latitude / 4.0).round() as i64,
            description: worldmap_core::weather::describe_code(2),
            wind_speed: longitude.abs().round() as i64,
            wind_direction: 270.0,
            code: 2,
            time: "2024-06-01T12:00".into(),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== worldmap: select a region ===\n");

    let loader = DatasetLoader::new(
        DemoFetcher::default(),
        MemoryResponseCache::new(),
        MemoryStore::new(),
    );
    let config = MapConfig::default();

    // Example 1: mount and draw
    println!("--- Example 1: Mount ---");
    let mut map = WorldMap::new(config.clone(), HeadlessSurface::new());
    let drawn = map.mount(&loader).await?;
    println!("Regions drawn: {drawn}");
    for (id, name) in map.layer().names() {
        println!("  #{id} {name}");
    }
    println!();

    // Example 2: the cache serves the second load
    println!("--- Example 2: Session cache ---");
    let mut second = WorldMap::new(config, HeadlessSurface::new());
    second.mount(&loader).await?;
    println!("Network requests after two mounts: {}\n", loader.fetcher().requests.get());

    // Example 3: hover / unhover
    println!("--- Example 3: Hover ---");
    map.hover(1);
    println!("Region 1 is {:?}, topmost: {:?}", map.layer().state(1), map.surface().topmost());
    map.unhover(1);
    println!("Region 1 is {:?}\n", map.layer().state(1));

    // Example 4: click + hydrate
    println!("--- Example 4: Click and hydrate ---");
    let selected: Rc<RefCell<Vec<RegionSelection>>> = Rc::default();
    let sink = Rc::clone(&selected);
    map.subscribe(move |s| sink.borrow_mut().push(s.clone()));
    map.click(0);
    map.click(1);
    map.click(2);

    let hydrator = DetailHydrator::new(DemoDirectory, FixedWeather);
    let picks = selected.borrow().clone();
    for selection in &picks {
        print!("{} [{}] at {} -> ", selection.name, selection.code, selection.coordinates);
        match hydrator.hydrate(selection).await {
            Hydration::Ready(details) => {
                let weather = details
                    .weather
                    .map(|w| format!("{}, {}°C", w.description, w.temperature))
                    .unwrap_or_else(|| "no weather".into());
                let capitals = details.country.capitals.join(", ");
                println!("{} ({capitals}), {weather}", details.country.name);
            }
            Hydration::NotFound => println!("no country record"),
            Hydration::Superseded => println!("superseded"),
        }
    }

    map.destroy();
    second.destroy();
    println!("\n✓ Done");
    Ok(())
}
