// crates/worldmap-core/src/country/rest.rs
use super::{CountryDirectory, CountryRecord, Currency};
use crate::dataset::HttpFetch;
use crate::error::{MapError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Fields requested for list endpoints. The API caps `fields` at ten.
const LIST_FIELDS: &str = "name,flags,region,population,capital,area,latlng,cca3";

// -----------------------------------------------------------------------------
// WIRE FORMAT (REST Countries v3.1)
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NameDto {
    common: String,
    #[serde(default)]
    official: String,
}

#[derive(Debug, Default, Deserialize)]
struct FlagsDto {
    #[serde(default)]
    png: String,
    #[serde(default)]
    svg: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyDto {
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct CountryDto {
    name: NameDto,
    cca3: String,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    subregion: Option<String>,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    area: f64,
    #[serde(default)]
    flags: FlagsDto,
    #[serde(default)]
    latlng: Vec<f64>,
    #[serde(default)]
    currencies: BTreeMap<String, CurrencyDto>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    timezones: Vec<String>,
}

/// `/alpha/{code}` answers with an array, older deployments with an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CountryDto>),
    One(Box<CountryDto>),
}

impl From<CountryDto> for CountryRecord {
    fn from(p: CountryDto) -> Self {
        CountryRecord {
            code: p.cca3,
            name: p.name.common,
            official_name: p.name.official,
            capitals: p.capital,
            region: p.region,
            subregion: p.subregion.unwrap_or_default(),
            population: p.population,
            area: p.area,
            flag_png: p.flags.png,
            flag_svg: p.flags.svg,
            latitude: p.latlng.first().copied().unwrap_or(0.0),
            longitude: p.latlng.get(1).copied().unwrap_or(0.0),
            currencies: p
                .currencies
                .into_iter()
                .map(|(code, c)| Currency {
                    code,
                    name: c.name,
                    symbol: c.symbol,
                })
                .collect(),
            languages: p.languages.into_values().collect(),
            timezones: p.timezones,
        }
    }
}

// -----------------------------------------------------------------------------
// CLIENT
// -----------------------------------------------------------------------------

/// [`CountryDirectory`] backed by the REST Countries API.
#[derive(Debug, Clone)]
pub struct RestCountriesClient<F> {
    fetcher: F,
    base: Url,
}

impl<F: HttpFetch> RestCountriesClient<F> {
    pub fn new(fetcher: F, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, segments: &[&str], fields: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MapError::InvalidData(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        if let Some(fields) = fields {
            url.query_pairs_mut().append_pair("fields", fields);
        }
        Ok(url)
    }

    async fn fetch_list(&self, url: Url) -> Result<Vec<CountryRecord>> {
        match self.fetcher.fetch(url.as_str()).await {
            Ok(body) => {
                let items: Vec<CountryDto> = serde_json::from_str(&body)?;
                Ok(items.into_iter().map(CountryRecord::from).collect())
            }
            Err(e) if e.is_not_found_status() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Every country, list fields only.
    pub async fn all(&self) -> Result<Vec<CountryRecord>> {
        self.fetch_list(self.endpoint(&["all"], Some(LIST_FIELDS))?)
            .await
    }

    pub async fn by_region(&self, region: &str) -> Result<Vec<CountryRecord>> {
        self.fetch_list(self.endpoint(&["region", region], Some(LIST_FIELDS))?)
            .await
    }
}

impl<F: HttpFetch> CountryDirectory for RestCountriesClient<F> {
    /// Full record: `/alpha` is queried without `fields` to dodge the cap.
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
        let url = self.endpoint(&["alpha", code], None)?;
        let body = match self.fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) if e.is_not_found_status() => return Ok(None),
            Err(e) => return Err(e),
        };
        let record = match serde_json::from_str::<OneOrMany>(&body)? {
            OneOrMany::Many(items) => items.into_iter().next().map(CountryRecord::from),
            OneOrMany::One(item) => Some(CountryRecord::from(*item)),
        };
        Ok(record)
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        self.fetch_list(self.endpoint(&["name", name], Some(LIST_FIELDS))?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned bodies by URL; anything else is a 404.
    #[derive(Default)]
    struct Canned {
        bodies: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl HttpFetch for Canned {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            self.bodies.get(url).cloned().ok_or(MapError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    const FRANCE: &str = r#"[{
        "name": {"common": "France", "official": "French Republic"},
        "cca3": "FRA",
        "capital": ["Paris"],
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 67391582,
        "area": 551695.0,
        "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
        "latlng": [46.0, 2.0],
        "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
        "languages": {"fra": "French"},
        "timezones": ["UTC-10:00", "UTC+01:00"]
    }]"#;

    fn client(bodies: &[(&str, &str)]) -> RestCountriesClient<Canned> {
        let fetcher = Canned {
            bodies: bodies
                .iter()
                .map(|(u, b)| (u.to_string(), b.to_string()))
                .collect(),
            ..Default::default()
        };
        RestCountriesClient::new(fetcher, "https://restcountries.test/v3.1").unwrap()
    }

    #[tokio::test]
    async fn maps_a_full_record() {
        let c = client(&[("https://restcountries.test/v3.1/alpha/FRA", FRANCE)]);
        let fr = c.get_by_code("FRA").await.unwrap().unwrap();
        assert_eq!(fr.code, "FRA");
        assert_eq!(fr.name, "France");
        assert_eq!(fr.official_name, "French Republic");
        assert_eq!(fr.capitals, vec!["Paris"]);
        assert_eq!(fr.subregion, "Western Europe");
        assert_eq!(fr.coordinates().latitude, 46.0);
        assert_eq!(fr.currencies[0].code, "EUR");
        assert_eq!(fr.currencies[0].symbol, "€");
        assert_eq!(fr.languages, vec!["French"]);
    }

    #[tokio::test]
    async fn accepts_a_single_object_and_missing_fields() {
        let body = r#"{"name": {"common": "Antarctica"}, "cca3": "ATA"}"#;
        let c = client(&[("https://restcountries.test/v3.1/alpha/ATA", body)]);
        let ata = c.get_by_code("ATA").await.unwrap().unwrap();
        assert_eq!(ata.name, "Antarctica");
        assert!(ata.capitals.is_empty());
        assert!(ata.coordinates().is_origin());
    }

    #[tokio::test]
    async fn not_found_is_none_or_empty() {
        let c = client(&[]);
        assert_eq!(c.get_by_code("XXX").await.unwrap(), None);
        assert!(c.search_by_name("Atlantis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn names_are_percent_encoded_with_list_fields() {
        let c = client(&[]);
        c.search_by_name("Côte d'Ivoire").await.unwrap();
        let url = c.fetcher.requested.borrow()[0].clone();
        assert!(url.starts_with("https://restcountries.test/v3.1/name/C%C3%B4te%20d'Ivoire?fields="));
        assert!(url.ends_with("latlng%2Ccca3") || url.ends_with("latlng,cca3"));
    }

    #[tokio::test]
    async fn other_statuses_are_errors() {
        struct Down;
        impl HttpFetch for Down {
            async fn fetch(&self, url: &str) -> Result<String> {
                Err(MapError::Status {
                    url: url.into(),
                    status: 503,
                })
            }
        }
        let c = RestCountriesClient::new(Down, "https://restcountries.test/v3.1").unwrap();
        assert!(c.get_by_code("FRA").await.is_err());
        assert!(c.all().await.is_err());
    }
}
