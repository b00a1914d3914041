// crates/worldmap-core/src/catalog.rs

//! Client-side filtering and pagination over in-memory lists: country records
//! from the directory, and the regions of a loaded dataset.

use crate::country::CountryRecord;
use crate::model::{Dataset, RegionSelection};
use crate::resolve::SelectionResolver;
use crate::text::contains_folded;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One page of a filtered list. `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

/// `None` when `number` is outside `1..=total_pages` (an empty list has no
/// pages at all).
pub fn paginate<T>(items: &[T], number: usize, per_page: usize) -> Option<Page<'_, T>> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    if number == 0 || number > total_pages {
        return None;
    }
    let start = (number - 1) * per_page;
    let end = (start + per_page).min(items.len());
    Some(Page {
        number,
        total_pages,
        total_items: items.len(),
        items: &items[start..end],
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Matched against names and capitals, accent- and case-insensitively.
    pub text: String,
    /// Exact region name, e.g. `"Europe"`; empty for all regions.
    pub region: String,
}

/// Country records sorted by name.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    countries: Vec<CountryRecord>,
}

impl CountryCatalog {
    pub fn new(mut countries: Vec<CountryRecord>) -> Self {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { countries }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn filter(&self, query: &CatalogQuery) -> Vec<CountryRecord> {
        let region = query.region.trim();
        self.countries
            .iter()
            .filter(|c| region.is_empty() || c.region == region)
            .filter(|c| {
                contains_folded(&c.name, &query.text)
                    || c.capitals.iter().any(|cap| contains_folded(cap, &query.text))
            })
            .cloned()
            .collect()
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .countries
            .iter()
            .map(|c| c.region.clone())
            .filter(|r| !r.is_empty())
            .collect();
        regions.sort();
        regions.dedup();
        regions
    }
}

/// Resolved identities of every region in a dataset, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    entries: Vec<RegionSelection>,
}

impl RegionIndex {
    pub fn build(dataset: &Dataset, resolver: &SelectionResolver) -> Self {
        Self {
            entries: dataset.features().iter().map(|f| resolver.resolve(f)).collect(),
        }
    }

    pub fn entries(&self) -> &[RegionSelection] {
        &self.entries
    }

    /// `(region id, selection)` pairs whose name or code contains `text`.
    pub fn search(&self, text: &str) -> Vec<(usize, &RegionSelection)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, s)| contains_folded(&s.name, text) || contains_folded(&s.code, text))
            .collect()
    }

    /// Exact (folded) name or code match first, then the first partial one.
    pub fn find(&self, text: &str) -> Option<(usize, &RegionSelection)> {
        let key = crate::text::fold_key(text);
        self.entries
            .iter()
            .enumerate()
            .find(|(_, s)| {
                crate::text::fold_key(&s.name) == key || crate::text::fold_key(&s.code) == key
            })
            .or_else(|| self.search(text).into_iter().next())
    }
}

/// Compact population figure: `1.4 B`, `67.4 M`, `8.9 K`, `812`.
pub fn format_population(n: u64) -> String {
    let n_f = n as f64;
    if n >= 1_000_000_000 {
        format!("{:.1} B", n_f / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1} M", n_f / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1} K", n_f / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, region: &str, capital: &str) -> CountryRecord {
        CountryRecord {
            region: region.into(),
            capitals: vec![capital.into()],
            ..CountryRecord::named(name[..3].to_uppercase(), name)
        }
    }

    fn catalog() -> CountryCatalog {
        CountryCatalog::new(vec![
            record("Peru", "Americas", "Lima"),
            record("Cameroon", "Africa", "Yaoundé"),
            record("France", "Europe", "Paris"),
            record("Germany", "Europe", "Berlin"),
        ])
    }

    #[test]
    fn sorted_by_name() {
        let names: Vec<_> = catalog().countries().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, ["Cameroon", "France", "Germany", "Peru"]);
    }

    #[test]
    fn filters_by_region_and_text() {
        let c = catalog();
        let europe = c.filter(&CatalogQuery {
            region: "Europe".into(),
            ..Default::default()
        });
        assert_eq!(europe.len(), 2);

        let by_capital = c.filter(&CatalogQuery {
            text: "yaounde".into(),
            ..Default::default()
        });
        assert_eq!(by_capital[0].name, "Cameroon");

        let none = c.filter(&CatalogQuery {
            text: "paris".into(),
            region: "Africa".into(),
        });
        assert!(none.is_empty());
        assert_eq!(c.regions(), ["Africa", "Americas", "Europe"]);
    }

    #[test]
    fn pagination_bounds() {
        let items: Vec<u32> = (1..=45).collect();
        let p = paginate(&items, 3, 20).unwrap();
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.items, &[41, 42, 43, 44, 45]);
        assert!(paginate(&items, 0, 20).is_none());
        assert!(paginate(&items, 4, 20).is_none());
        assert!(paginate::<u32>(&[], 1, 20).is_none());
    }

    #[test]
    fn population_formatting() {
        assert_eq!(format_population(1_402_112_000), "1.4 B");
        assert_eq!(format_population(67_391_582), "67.4 M");
        assert_eq!(format_population(8_900), "8.9 K");
        assert_eq!(format_population(812), "812");
    }
}
