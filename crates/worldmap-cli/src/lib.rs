//! worldmap-cli
//! ============
//!
//! Command-line interface for the `worldmap-core` selection pipeline.
//!
//! This crate primarily provides a binary (`worldmap`). The library target
//! only carries this overview so that the documentation renders a page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! worldmap --help
//! worldmap regions --query land
//! worldmap resolve "côte d'ivoire"
//! worldmap click france
//! worldmap country -99 --name Norway
//! worldmap countries --region Europe --page 2
//! worldmap weather 48.85 2.35
//! ```
//!
//! The boundary dataset is fetched once and cached on disk (`--cache-dir`);
//! later runs read it back without touching the network.
//!
//! For programmatic access use the [`worldmap-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
