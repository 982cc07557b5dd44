//! OpenWeather HTTP client: current conditions, 5-day/3-hour forecast, and
//! the direct geocoding endpoint used as the city-search fallback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::SkycastError;
use crate::model::{
    CityCandidate, Condition, Coordinates, CurrentConditions, Forecast, ForecastSample,
};

use super::{CityLookup, WeatherProvider};

const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// 5 days at 3-hour intervals.
const FORECAST_SAMPLES: u32 = 40;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SkycastError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SkycastError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, SkycastError> {
        debug!(lat = coords.lat, lon = coords.lon, "fetching current conditions");

        let parsed: OwCurrentResponse = self
            .get_json(
                WEATHER_URL,
                &[
                    ("lat", coords.lat.to_string()),
                    ("lon", coords.lon.to_string()),
                    ("appid", self.api_key.clone()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        Ok(current_from_wire(parsed))
    }

    async fn forecast(&self, coords: Coordinates) -> Result<Forecast, SkycastError> {
        debug!(lat = coords.lat, lon = coords.lon, "fetching 5-day forecast");

        let parsed: OwForecastResponse = self
            .get_json(
                FORECAST_URL,
                &[
                    ("lat", coords.lat.to_string()),
                    ("lon", coords.lon.to_string()),
                    ("cnt", FORECAST_SAMPLES.to_string()),
                    ("appid", self.api_key.clone()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        if parsed.list.is_empty() {
            return Err(SkycastError::MalformedResponse(
                "forecast response contained no samples".to_string(),
            ));
        }

        Ok(forecast_from_wire(parsed))
    }
}

#[async_trait]
impl CityLookup for OpenWeatherClient {
    async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CityCandidate>, SkycastError> {
        debug!(query, limit, "geocoding city query");

        let parsed: Vec<OwGeoEntry> = self
            .get_json(
                GEOCODING_URL,
                &[
                    ("q", query.to_string()),
                    ("limit", limit.to_string()),
                    ("appid", self.api_key.clone()),
                ],
            )
            .await?;

        Ok(parsed.into_iter().map(candidate_from_geo).collect())
    }
}

// Wire format. Private to this module; everything leaving it is a domain type.

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<Condition>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<Condition>,
    wind: OwWind,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
    coord: OwCoord,
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

fn current_from_wire(parsed: OwCurrentResponse) -> CurrentConditions {
    CurrentConditions {
        city: parsed.name,
        country: parsed.sys.country.unwrap_or_default(),
        coordinates: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
        temp_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        temp_min_c: parsed.main.temp_min,
        temp_max_c: parsed.main.temp_max,
        pressure_hpa: parsed.main.pressure,
        humidity_pct: parsed.main.humidity,
        condition: parsed.weather.into_iter().next(),
        wind_speed_mps: parsed.wind.speed,
        wind_deg: parsed.wind.deg,
        sunrise: unix_to_utc(parsed.sys.sunrise),
        sunset: unix_to_utc(parsed.sys.sunset),
        observation_time: unix_to_utc(parsed.dt),
        utc_offset_secs: parsed.timezone,
    }
}

fn forecast_from_wire(parsed: OwForecastResponse) -> Forecast {
    let samples = parsed
        .list
        .into_iter()
        .map(|entry| ForecastSample {
            timestamp: entry.dt,
            temp_c: entry.main.temp,
            temp_min_c: entry.main.temp_min,
            temp_max_c: entry.main.temp_max,
            condition: entry.weather.into_iter().next(),
            precipitation_probability: entry.pop.clamp(0.0, 1.0),
            humidity_pct: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
        })
        .collect();

    Forecast {
        city: parsed.city.name,
        country: parsed.city.country,
        coordinates: Coordinates { lat: parsed.city.coord.lat, lon: parsed.city.coord.lon },
        utc_offset_secs: parsed.city.timezone,
        samples,
    }
}

fn candidate_from_geo(entry: OwGeoEntry) -> CityCandidate {
    CityCandidate {
        name: entry.name,
        country: entry.country,
        region: entry.state,
        coordinates: Coordinates { lat: entry.lat, lon: entry.lon },
        // The geocoding endpoint carries no population figure.
        population: 0,
    }
}

// Out-of-range wire timestamps clamp to the epoch; mapping stays a pure
// function of the payload.
fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
