use clap::{Parser, Subcommand};
use std::path::PathBuf;
use worldmap_core::ThemeMode;

/// CLI arguments for worldmap
#[derive(Debug, Parser)]
#[command(
    name = "worldmap",
    version,
    about = "Load the country-boundary dataset, resolve regions and look up country details"
)]
pub struct CliArgs {
    /// Path to a TOML config file (every field optional)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory of the on-disk dataset cache (default: <tmp>/worldmap-cache)
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Tile theme of the headless map (light or dark); overrides the config
    #[arg(long = "theme", global = true)]
    pub theme: Option<ThemeMode>,

    /// Log debug output (RUST_LOG still takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the regions of the boundary dataset
    Regions {
        /// Accent- and case-insensitive filter on name or code
        #[arg(short = 'q', long = "query", default_value = "")]
        query: String,

        #[arg(short = 'p', long = "page", default_value_t = 1)]
        page: usize,

        #[arg(long = "per-page", default_value_t = worldmap_core::catalog::DEFAULT_PAGE_SIZE)]
        per_page: usize,
    },

    /// Resolve the first region whose name or code matches
    Resolve {
        /// Region name or code (e.g. "France", "fra")
        query: String,
    },

    /// Hover and click a region on a headless map, then show its details
    Click {
        /// Region name or code
        query: String,
    },

    /// Match a country by code, falling back to a name search
    Country {
        /// ISO code (e.g. FRA, fr); `-99` placeholders are accepted
        #[arg(allow_hyphen_values = true)]
        code: String,

        /// Name to search when the code is unknown
        #[arg(short = 'n', long = "name", default_value = "")]
        name: String,
    },

    /// List countries from the country directory
    Countries {
        /// Filter on name or capital
        #[arg(short = 'q', long = "query", default_value = "")]
        query: String,

        /// Exact region, e.g. Europe
        #[arg(short = 'r', long = "region", default_value = "")]
        region: String,

        #[arg(short = 'p', long = "page", default_value_t = 1)]
        page: usize,
    },

    /// Current weather at a point
    Weather {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
}
