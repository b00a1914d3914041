// crates/worldmap-core/src/country/mod.rs

//! # Country Match Fallback
//!
//! Boundary datasets and country APIs do not always agree on codes (disputed
//! territories, `-99` placeholders, two- vs three-letter codes). The match
//! therefore tries the code first and falls back to a name search:
//!
//! 1. code given → `get_by_code`; a hit ends the match.
//! 2. name given → `search_by_name`; prefer an exact case-insensitive name
//!    match, else take the first result.
//! 3. neither → no request at all.
//!
//! Transport errors are logged and read as "not found".

mod rest;

pub use rest::RestCountriesClient;

use crate::error::Result;
use crate::model::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Canonical country entity. Matching only looks at `code` and `name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3.
    pub code: String,
    /// Common name.
    pub name: String,
    pub official_name: String,
    pub capitals: Vec<String>,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    /// km²
    pub area: f64,
    pub flag_png: String,
    pub flag_svg: String,
    pub latitude: f64,
    pub longitude: f64,
    pub currencies: Vec<Currency>,
    pub languages: Vec<String>,
    pub timezones: Vec<String>,
}

impl CountryRecord {
    /// Minimal record; mostly useful in tests and fixtures.
    pub fn named(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Source of canonical country records.
#[allow(async_fn_in_trait)]
pub trait CountryDirectory {
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>>;

    async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>>;
}

impl<T: CountryDirectory + ?Sized> CountryDirectory for &T {
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
        (**self).get_by_code(code).await
    }
    async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        (**self).search_by_name(name).await
    }
}

impl<T: CountryDirectory + ?Sized> CountryDirectory for std::rc::Rc<T> {
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
        (**self).get_by_code(code).await
    }
    async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        (**self).search_by_name(name).await
    }
}

pub async fn match_country<D: CountryDirectory>(
    directory: &D,
    code: &str,
    name: &str,
) -> Option<CountryRecord> {
    let code = code.trim();
    let name = name.trim();

    if !code.is_empty() {
        match directory.get_by_code(code).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => log::debug!("no country for code {code}"),
            Err(e) => log::warn!("country lookup for {code} failed: {e}"),
        }
    }

    if name.is_empty() {
        return None;
    }

    let results = match directory.search_by_name(name).await {
        Ok(results) => results,
        Err(e) => {
            log::warn!("country search for '{name}' failed: {e}");
            return None;
        }
    };

    pick_by_name(results, name)
}

/// Exact case-insensitive name match, else the first candidate.
pub fn pick_by_name(candidates: Vec<CountryRecord>, name: &str) -> Option<CountryRecord> {
    let wanted = name.to_lowercase();
    let exact = candidates
        .iter()
        .position(|c| c.name.to_lowercase() == wanted);
    let index = exact.unwrap_or(0);
    candidates.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use std::cell::Cell;

    #[derive(Default)]
    struct Directory {
        by_code: Vec<CountryRecord>,
        search: Vec<CountryRecord>,
        fail_code: bool,
        fail_search: bool,
        code_calls: Cell<usize>,
        search_calls: Cell<usize>,
    }

    impl CountryDirectory for Directory {
        async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
            self.code_calls.set(self.code_calls.get() + 1);
            if self.fail_code {
                return Err(MapError::Transport("offline".into()));
            }
            Ok(self
                .by_code
                .iter()
                .find(|c| c.code.eq_ignore_ascii_case(code))
                .cloned())
        }

        async fn search_by_name(&self, _name: &str) -> Result<Vec<CountryRecord>> {
            self.search_calls.set(self.search_calls.get() + 1);
            if self.fail_search {
                return Err(MapError::Transport("offline".into()));
            }
            Ok(self.search.clone())
        }
    }

    #[tokio::test]
    async fn code_hit_skips_the_name_search() {
        let dir = Directory {
            by_code: vec![CountryRecord::named("FRA", "France")],
            search: vec![CountryRecord::named("XXX", "France")],
            ..Default::default()
        };
        let hit = match_country(&dir, "FRA", "France").await.unwrap();
        assert_eq!(hit.code, "FRA");
        assert_eq!(dir.code_calls.get(), 1);
        assert_eq!(dir.search_calls.get(), 0);
    }

    #[tokio::test]
    async fn empty_search_is_no_match() {
        let dir = Directory::default();
        assert_eq!(match_country(&dir, "", "Atlantis").await, None);
        assert_eq!(dir.code_calls.get(), 0);
        assert_eq!(dir.search_calls.get(), 1);
    }

    #[tokio::test]
    async fn first_result_without_exact_match() {
        let dir = Directory {
            search: vec![
                CountryRecord::named("KOR", "South Korea"),
                CountryRecord::named("PRK", "North Korea"),
            ],
            ..Default::default()
        };
        let hit = match_country(&dir, "", "Korea").await.unwrap();
        assert_eq!(hit.name, "South Korea");
    }

    #[tokio::test]
    async fn exact_match_is_case_insensitive() {
        let dir = Directory {
            search: vec![
                CountryRecord::named("GNQ", "Equatorial Guinea"),
                CountryRecord::named("GIN", "Guinea"),
            ],
            ..Default::default()
        };
        let hit = match_country(&dir, "", "  GUINEA ").await.unwrap();
        assert_eq!(hit.code, "GIN");
    }

    #[tokio::test]
    async fn nothing_to_match_issues_no_request() {
        let dir = Directory::default();
        assert_eq!(match_country(&dir, " ", "").await, None);
        assert_eq!(dir.code_calls.get() + dir.search_calls.get(), 0);
    }

    #[tokio::test]
    async fn code_failure_falls_back_to_name() {
        let dir = Directory {
            fail_code: true,
            search: vec![CountryRecord::named("NOR", "Norway")],
            ..Default::default()
        };
        let hit = match_country(&dir, "-99", "Norway").await.unwrap();
        assert_eq!(hit.code, "NOR");
        assert_eq!(dir.search_calls.get(), 1);
    }

    #[tokio::test]
    async fn search_failure_is_no_match() {
        let dir = Directory {
            fail_search: true,
            ..Default::default()
        };
        assert_eq!(match_country(&dir, "ZZZ", "Nowhere").await, None);
    }
}
