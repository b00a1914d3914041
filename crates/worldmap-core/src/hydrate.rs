// crates/worldmap-core/src/hydrate.rs

//! Turns a [`RegionSelection`] into full country details plus current
//! weather: the consumer a detail view puts behind the selection event.
//!
//! Lookups are sequenced. Every call takes a ticket; when a newer call has
//! started by the time an older one finishes, the older result is reported as
//! [`Hydration::Superseded`] and must not be displayed. A fast second click
//! therefore never gets overwritten by a slow first one.

use crate::country::{match_country, CountryDirectory, CountryRecord};
use crate::model::RegionSelection;
use crate::weather::{Weather, WeatherSource};
use serde::Serialize;
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDetails {
    pub country: CountryRecord,
    pub weather: Option<Weather>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Hydration {
    Ready(CountryDetails),
    NotFound,
    /// A newer hydration started while this one was in flight.
    Superseded,
}

pub struct DetailHydrator<D, W> {
    directory: D,
    weather: W,
    latest: Cell<u64>,
}

impl<D: CountryDirectory, W: WeatherSource> DetailHydrator<D, W> {
    pub fn new(directory: D, weather: W) -> Self {
        Self {
            directory,
            weather,
            latest: Cell::new(0),
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn take_ticket(&self) -> u64 {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);
        ticket
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest.get() == ticket
    }

    /// Invalidates every in-flight hydration (the detail view was closed).
    pub fn cancel(&self) {
        self.take_ticket();
    }

    pub async fn hydrate(&self, selection: &RegionSelection) -> Hydration {
        let ticket = self.take_ticket();

        let Some(country) =
            match_country(&self.directory, &selection.code, &selection.name).await
        else {
            return if self.is_current(ticket) {
                Hydration::NotFound
            } else {
                Hydration::Superseded
            };
        };
        if !self.is_current(ticket) {
            return Hydration::Superseded;
        }

        let at = if country.coordinates().is_origin() {
            selection.coordinates
        } else {
            country.coordinates()
        };
        let weather = if at.is_origin() {
            None
        } else {
            match self.weather.current(at.latitude, at.longitude).await {
                Ok(w) => Some(w),
                Err(e) => {
                    log::warn!("weather for {} unavailable: {e}", country.name);
                    None
                }
            }
        };
        if !self.is_current(ticket) {
            return Hydration::Superseded;
        }

        Hydration::Ready(CountryDetails { country, weather })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MapError, Result};
    use crate::model::Coordinates;
    use std::cell::Cell;

    struct Directory {
        countries: Vec<CountryRecord>,
    }

    impl CountryDirectory for Directory {
        async fn get_by_code(&self, code: &str) -> Result<Option<CountryRecord>> {
            tokio::task::yield_now().await;
            Ok(self.countries.iter().find(|c| c.code == code).cloned())
        }

        async fn search_by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
            tokio::task::yield_now().await;
            Ok(self
                .countries
                .iter()
                .filter(|c| c.name.contains(name))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct Sky {
        fail: bool,
        asked: Cell<Option<(f64, f64)>>,
    }

    impl WeatherSource for Sky {
        async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather> {
            self.asked.set(Some((latitude, longitude)));
            if self.fail {
                return Err(MapError::Transport("offline".into()));
            }
            Ok(Weather {
                temperature: 18,
                description: "Clear sky".into(),
                wind_speed: 7,
                wind_direction: 180.0,
                code: 0,
                time: "2024-06-01T12:00".into(),
            })
        }
    }

    fn directory() -> Directory {
        let mut france = CountryRecord::named("FRA", "France");
        france.latitude = 46.0;
        france.longitude = 2.0;
        Directory {
            countries: vec![france, CountryRecord::named("ATA", "Antarctica")],
        }
    }

    fn selection(name: &str, code: &str, at: Coordinates) -> RegionSelection {
        RegionSelection {
            name: name.into(),
            code: code.into(),
            coordinates: at,
        }
    }

    #[tokio::test]
    async fn ready_with_weather_at_country_coordinates() {
        let sky = Sky::default();
        let h = DetailHydrator::new(directory(), &sky);
        let got = h
            .hydrate(&selection("France", "FRA", Coordinates::new(44.0, 1.0)))
            .await;
        let Hydration::Ready(details) = got else {
            panic!("expected details, got {got:?}");
        };
        assert_eq!(details.country.code, "FRA");
        assert_eq!(details.weather.unwrap().temperature, 18);
        assert_eq!(sky.asked.get(), Some((46.0, 2.0)));
    }

    #[tokio::test]
    async fn falls_back_to_selection_coordinates() {
        let sky = Sky::default();
        let h = DetailHydrator::new(directory(), &sky);
        h.hydrate(&selection("Antarctica", "ATA", Coordinates::new(-80.0, 10.0)))
            .await;
        assert_eq!(sky.asked.get(), Some((-80.0, 10.0)));
    }

    #[tokio::test]
    async fn no_weather_request_without_any_coordinates() {
        let sky = Sky::default();
        let h = DetailHydrator::new(directory(), &sky);
        let got = h
            .hydrate(&selection("Antarctica", "ATA", Coordinates::ORIGIN))
            .await;
        assert!(matches!(got, Hydration::Ready(CountryDetails { weather: None, .. })));
        assert_eq!(sky.asked.get(), None);
    }

    #[tokio::test]
    async fn weather_failure_still_yields_details() {
        let sky = Sky {
            fail: true,
            ..Default::default()
        };
        let h = DetailHydrator::new(directory(), &sky);
        let got = h
            .hydrate(&selection("France", "FRA", Coordinates::ORIGIN))
            .await;
        assert!(matches!(got, Hydration::Ready(CountryDetails { weather: None, .. })));
    }

    #[tokio::test]
    async fn unknown_country_is_not_found() {
        let h = DetailHydrator::new(directory(), Sky::default());
        let got = h
            .hydrate(&selection("Atlantis", "ATL", Coordinates::ORIGIN))
            .await;
        assert_eq!(got, Hydration::NotFound);
    }

    #[tokio::test]
    async fn newer_selection_supersedes_older_one() {
        let h = DetailHydrator::new(directory(), Sky::default());
        let first = selection("Antarctica", "ATA", Coordinates::ORIGIN);
        let second = selection("France", "FRA", Coordinates::ORIGIN);

        let (a, b) = futures::join!(h.hydrate(&first), h.hydrate(&second));
        assert_eq!(a, Hydration::Superseded);
        let Hydration::Ready(details) = b else {
            panic!("expected details, got {b:?}");
        };
        assert_eq!(details.country.name, "France");
    }

    #[tokio::test]
    async fn cancel_invalidates_in_flight_lookups() {
        let h = DetailHydrator::new(directory(), Sky::default());
        let sel = selection("France", "FRA", Coordinates::ORIGIN);
        let (got, ()) = futures::join!(h.hydrate(&sel), async { h.cancel() });
        assert_eq!(got, Hydration::Superseded);
    }
}
