// crates/worldmap-core/src/weather.rs
use crate::dataset::HttpFetch;
use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Current conditions at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// °C, rounded.
    pub temperature: i64,
    pub description: String,
    /// km/h, rounded.
    pub wind_speed: i64,
    /// Degrees.
    pub wind_direction: f64,
    /// WMO weather interpretation code.
    pub code: u16,
    /// Observation time as reported (ISO 8601, local to the API).
    pub time: String,
}

#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather>;
}

impl<T: WeatherSource + ?Sized> WeatherSource for &T {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather> {
        (**self).current(latitude, longitude).await
    }
}

impl<T: WeatherSource + ?Sized> WeatherSource for std::rc::Rc<T> {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather> {
        (**self).current(latitude, longitude).await
    }
}

/// Human-readable label for a WMO weather code.
pub fn describe_code(code: u16) -> String {
    let label = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Freezing drizzle",
        61 => "Slight rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Freezing rain",
        71 => "Slight snowfall",
        73 => "Snowfall",
        75 => "Heavy snowfall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Severe thunderstorm",
        other => return format!("Weather code: {other}"),
    };
    label.to_string()
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherDto {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: u16,
    time: String,
}

#[derive(Debug, Deserialize)]
struct ForecastDto {
    current_weather: Option<CurrentWeatherDto>,
}

/// [`WeatherSource`] backed by the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient<F> {
    fetcher: F,
    base: Url,
}

impl<F: HttpFetch> OpenMeteoClient<F> {
    pub fn new(fetcher: F, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base: Url::parse(base_url)?,
        })
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MapError::InvalidData(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .push("forecast");
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("current_weather", "true");
        Ok(url)
    }
}

impl<F: HttpFetch> WeatherSource for OpenMeteoClient<F> {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather> {
        let url = self.forecast_url(latitude, longitude)?;
        let body = self.fetcher.fetch(url.as_str()).await?;
        let forecast: ForecastDto = serde_json::from_str(&body)?;
        let now = forecast
            .current_weather
            .ok_or_else(|| MapError::InvalidData("weather unavailable".into()))?;

        Ok(Weather {
            temperature: now.temperature.round() as i64,
            description: describe_code(now.weathercode),
            wind_speed: now.windspeed.round() as i64,
            wind_direction: now.winddirection,
            code: now.weathercode,
            time: now.time,
        })
    }
}
