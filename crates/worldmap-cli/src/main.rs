//! worldmap: the selection pipeline from a terminal.
//!
//! Usage examples
//! --------------
//!
//! - List regions of the boundary dataset, filtered and paged
//!   $ worldmap regions --query guinea
//!
//! - Resolve a region the way a click would
//!   $ worldmap resolve fra
//!
//! - Simulate hover + click on a headless map and hydrate the selection
//!   $ worldmap click "United Kingdom"
//!
//! - Country match fallback (code first, then name)
//!   $ worldmap country -99 --name Norway
//!
//! - Country catalog and weather
//!   $ worldmap countries --region Europe
//!   $ worldmap weather -33.87 151.21
//!
//! Data source
//! -----------
//!
//! The dataset comes from the primary URL of the config (fallback on failure)
//! and is cached under `--cache-dir`, so only the first run hits the network.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use std::cell::RefCell;
use std::rc::Rc;
use worldmap_core::catalog::{format_population, paginate, CatalogQuery, CountryCatalog, RegionIndex};
use worldmap_core::prelude::*;
use worldmap_core::{match_country, CountryDetails, Weather};

/// A started map on a headless surface. A terminal has no viewport, so a
/// deferred map is reported visible right away.
fn start_headless(config: &MapConfig) -> anyhow::Result<WorldMap<HeadlessSurface>> {
    let mut map = WorldMap::new(config.clone(), HeadlessSurface::new());
    let started = if config.deferred {
        map.notify_visibility(true)?
    } else {
        map.begin_mount()?
    };
    if started.is_none() {
        bail!("map did not start");
    }
    Ok(map)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.config {
        Some(path) => MapConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MapConfig::default(),
    };
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("worldmap-cache"));
    log::debug!("dataset cache in {}", cache_dir.display());

    let fetcher = ReqwestFetcher::new();
    let loader = DatasetLoader::new(&fetcher, DiskResponseCache::new(cache_dir), MemoryStore::new());
    let resolver = SelectionResolver::default();

    match args.command {
        Commands::Regions {
            query,
            page,
            per_page,
        } => {
            let dataset = load_dataset(&loader, &config).await?;
            let index = RegionIndex::build(&dataset, &resolver);
            let hits = index.search(&query);
            if hits.is_empty() {
                println!("No regions found matching: {query}");
                return Ok(());
            }
            let Some(p) = paginate(&hits, page, per_page) else {
                bail!("page {page} out of range");
            };
            for (id, s) in p.items {
                println!("{id:>4}  {:<4} {}", s.code, s.name);
            }
            println!("-- page {}/{} ({} regions)", p.number, p.total_pages, p.total_items);
        }

        Commands::Resolve { query } => {
            let dataset = load_dataset(&loader, &config).await?;
            let index = RegionIndex::build(&dataset, &resolver);
            match index.find(&query) {
                Some((id, s)) => print_selection(id, s),
                None => eprintln!("No region found for: {query}"),
            }
        }

        Commands::Click { query } => {
            let dataset = load_dataset(&loader, &config).await?;
            let Some(id) = RegionIndex::build(&dataset, &resolver)
                .find(&query)
                .map(|(id, _)| id)
            else {
                eprintln!("No region found for: {query}");
                return Ok(());
            };

            let mut map = start_headless(&config)?;
            map.finish_initialize(Ok(dataset));

            let clicked: Rc<RefCell<Option<RegionSelection>>> = Rc::default();
            let sink = Rc::clone(&clicked);
            map.subscribe(move |s| *sink.borrow_mut() = Some(s.clone()));

            map.hover(id);
            map.click(id);
            map.unhover(id);
            let Some(selection) = clicked.borrow_mut().take() else {
                bail!("region {id} emitted no selection");
            };
            print_selection(id, &selection);
            map.destroy();

            let directory = RestCountriesClient::new(&fetcher, &config.countries_api)?;
            let weather = OpenMeteoClient::new(&fetcher, &config.weather_api)?;
            let hydrator = DetailHydrator::new(directory, weather);
            match hydrator.hydrate(&selection).await {
                Hydration::Ready(details) => print_details(&details),
                Hydration::NotFound => println!("No country record for {}", selection.name),
                Hydration::Superseded => {}
            }
        }

        Commands::Country { code, name } => {
            let directory = RestCountriesClient::new(&fetcher, &config.countries_api)?;
            match match_country(&directory, &code, &name).await {
                Some(country) => print_details(&CountryDetails {
                    country,
                    weather: None,
                }),
                None => eprintln!("No country found for: {code} {name}"),
            }
        }

        Commands::Countries {
            query,
            region,
            page,
        } => {
            let directory = RestCountriesClient::new(&fetcher, &config.countries_api)?;
            let catalog = CountryCatalog::new(directory.all().await?);
            let matches = catalog.filter(&CatalogQuery {
                text: query,
                region,
            });
            if matches.is_empty() {
                println!("No countries found (regions: {})", catalog.regions().join(", "));
                return Ok(());
            }
            let per_page = worldmap_core::catalog::DEFAULT_PAGE_SIZE;
            let Some(p) = paginate(&matches, page, per_page) else {
                bail!("page {page} out of range");
            };
            for c in p.items {
                println!(
                    "{:<4} {:<32} {:<20} {:>9}",
                    c.code,
                    c.name,
                    c.capitals.first().map(String::as_str).unwrap_or("-"),
                    format_population(c.population)
                );
            }
            println!("-- page {}/{} ({} countries)", p.number, p.total_pages, p.total_items);
        }

        Commands::Weather {
            latitude,
            longitude,
        } => {
            let source = OpenMeteoClient::new(&fetcher, &config.weather_api)?;
            let weather = source.current(latitude, longitude).await?;
            print_weather(&weather);
        }
    }

    Ok(())
}

async fn load_dataset<L: LoadDataset>(loader: &L, config: &MapConfig) -> anyhow::Result<Dataset> {
    loader
        .load(&config.dataset.primary, &config.dataset.fallback)
        .await
        .context("boundary dataset unavailable")
}

fn print_selection(id: RegionId, s: &RegionSelection) {
    println!("Region #{id}: {}", s.name);
    println!("Code: {}", if s.code.is_empty() { "-" } else { s.code.as_str() });
    println!("Center: {}", s.coordinates);
}

fn print_details(details: &CountryDetails) {
    let c = &details.country;
    println!("Country: {} ({})", c.name, c.code);
    if !c.official_name.is_empty() {
        println!("Official name: {}", c.official_name);
    }
    println!("Capital: {}", c.capitals.join(", "));
    println!("Region: {} / {}", c.region, c.subregion);
    println!("Population: {}", format_population(c.population));
    println!("Area: {} km²", c.area);
    if !c.currencies.is_empty() {
        let currencies: Vec<String> = c
            .currencies
            .iter()
            .map(|cur| format!("{} ({})", cur.name, cur.symbol))
            .collect();
        println!("Currencies: {}", currencies.join(", "));
    }
    if !c.languages.is_empty() {
        println!("Languages: {}", c.languages.join(", "));
    }
    if let Some(w) = &details.weather {
        print_weather(w);
    }
}

fn print_weather(w: &Weather) {
    println!(
        "Weather: {}, {}°C, wind {} km/h from {}° ({})",
        w.description, w.temperature, w.wind_speed, w.wind_direction, w.time
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_config_starts_the_headless_map() {
        let map = start_headless(&MapConfig::default()).unwrap();
        assert!(map.surface().is_initialized());
        assert_eq!(map.state(), InitState::Initialized);
    }

    #[test]
    fn deferred_config_starts_the_headless_map() {
        let config = MapConfig {
            deferred: true,
            ..MapConfig::default()
        };
        let mut map = start_headless(&config).unwrap();
        assert!(map.surface().is_initialized());
        assert_eq!(map.surface().initializations(), 1);
        assert_eq!(map.state(), InitState::Initialized);

        let ds = Dataset::parse(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"ADMIN":"France"},"geometry":null}]}"#,
        )
        .unwrap();
        assert_eq!(map.finish_initialize(Ok(ds)), 1);
    }
}
