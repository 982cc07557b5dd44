use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::SkycastError;
use crate::model::{CityCandidate, Coordinates, CurrentConditions, Forecast};

pub mod openweather;

/// Weather data source: one current-conditions snapshot and the 5-day
/// 3-hour-interval forecast feed.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, coords: Coordinates)
    -> Result<CurrentConditions, SkycastError>;

    async fn forecast(&self, coords: Coordinates) -> Result<Forecast, SkycastError>;
}

/// Remote city lookup, the fallback the caller invokes after local ranking
/// returned zero or few results. Debounce and cancellation of superseded
/// lookups belong to the caller, not to implementations.
#[async_trait]
pub trait CityLookup: Send + Sync + Debug {
    async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CityCandidate>, SkycastError>;
}
