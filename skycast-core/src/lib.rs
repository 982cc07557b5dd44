//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - The city search ranker and the bundled city dataset
//! - The forecast-by-day aggregator
//! - Configuration & credentials handling
//! - The OpenWeather provider client (current conditions, forecast, geocoding)
//! - Shared domain models and display formatting helpers
//!
//! The two data-processing cores, [`search::rank`] and
//! [`forecast::group_by_day`], are pure and deterministic; everything
//! asynchronous (debouncing, cancelling superseded lookups) is owned by
//! callers such as `skycast-cli`.

pub mod cities;
pub mod config;
pub mod error;
pub mod forecast;
pub mod format;
pub mod model;
pub mod provider;
pub mod search;

pub use config::Config;
pub use error::SkycastError;
pub use forecast::{first_n, group_by_day};
pub use model::{
    CityCandidate, Condition, Coordinates, CurrentConditions, DaySummary, Forecast,
    ForecastSample, RankedMatch,
};
pub use provider::{CityLookup, WeatherProvider, openweather::OpenWeatherClient};
pub use search::rank;
