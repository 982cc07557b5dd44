use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A city eligible to be matched against a search query.
///
/// Candidates come from the bundled dataset ([`crate::cities`]) or from the
/// geocoding fallback; both are plain immutable values handed to
/// [`crate::search::rank`] by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityCandidate {
    pub name: String,
    /// ISO country code, e.g. "GB".
    pub country: String,
    /// State or province, where it helps disambiguation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Used only as a ranking tie-break weight. Zero when unknown.
    #[serde(default)]
    pub population: u64,
}

impl CityCandidate {
    /// "Name, Region, Country" or "Name, Country" when no region is known.
    pub fn display_name(&self) -> String {
        match &self.region {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// One search hit: a candidate plus the score it got for the current query.
///
/// Scores are only meaningful for ordering within a single query evaluation;
/// they must not be cached or compared across queries.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub candidate: CityCandidate,
    pub score: f64,
}

/// OpenWeather condition record ("Clear" / "clear sky" / "01d").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// One 3-hour forecast sample as returned by the 5-day forecast feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix seconds, the sample's valid time.
    pub timestamp: i64,
    pub temp_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    /// Absent when the upstream `weather` array was empty; such a sample is
    /// considered malformed by the aggregator and skipped.
    pub condition: Option<Condition>,
    /// Probability of precipitation in `[0, 1]`.
    pub precipitation_probability: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// Reduction of all samples sharing one local calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// Calendar date in the forecast location's local time, "YYYY-MM-DD".
    pub date_key: String,
    /// Valid time of the first sample in the bucket.
    pub timestamp: i64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    /// Condition occurring in the most samples of the day.
    pub condition: Condition,
    /// Maximum probability of precipitation across the day.
    pub precipitation_probability: f64,
    /// Number of samples reduced into this summary.
    pub sample_count: usize,
}

/// Full 5-day forecast for one location.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
    /// Shift from UTC of the forecast location, seconds.
    pub utc_offset_secs: i32,
    /// Chronological 3-hour samples, typically 40.
    pub samples: Vec<ForecastSample>,
}

/// Single current-conditions snapshot. Not processed by the aggregator.
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub pressure_hpa: u32,
    pub humidity_pct: u8,
    pub condition: Option<Condition>,
    pub wind_speed_mps: f64,
    pub wind_deg: u16,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observation_time: DateTime<Utc>,
    pub utc_offset_secs: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_with_and_without_region() {
        let mut city = CityCandidate {
            name: "New York".to_string(),
            country: "US".to_string(),
            region: Some("NY".to_string()),
            coordinates: Coordinates { lat: 40.7128, lon: -74.006 },
            population: 8_336_817,
        };
        assert_eq!(city.display_name(), "New York, NY, US");

        city.region = None;
        assert_eq!(city.display_name(), "New York, US");
    }

    #[test]
    fn candidate_deserializes_from_flat_json() {
        let json = r#"{"name":"London","country":"GB","lat":51.5074,"lon":-0.1278,"population":8982000}"#;
        let city: CityCandidate = serde_json::from_str(json).expect("valid candidate JSON");

        assert_eq!(city.name, "London");
        assert_eq!(city.region, None);
        assert!((city.coordinates.lat - 51.5074).abs() < 1e-9);
        assert_eq!(city.population, 8_982_000);
    }
}
