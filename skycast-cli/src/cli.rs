use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};

use skycast_core::{
    CityCandidate, Config, Coordinates, CurrentConditions, DaySummary, Forecast, ForecastSample,
    OpenWeatherClient,
    cities,
    format,
    provider::{CityLookup, WeatherProvider},
    search,
};

/// How many matches a search prints.
const SEARCH_LIMIT: usize = 10;
/// Below this many local hits, the geocoding fallback kicks in.
const REMOTE_FALLBACK_THRESHOLD: usize = 3;
/// Hourly strip length: the next 24 hours at 3-hour intervals.
const HOURLY_STRIP: usize = 8;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store your OpenWeather API key.
    Configure,

    /// Search for a city by name.
    Search {
        /// Free-text query, e.g. "lond".
        query: String,
    },

    /// Show current conditions for a city.
    Now {
        /// City name, e.g. "London".
        city: String,
    },

    /// Show the 5-day forecast for a city.
    Forecast {
        /// City name, e.g. "London".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { query } => search_cities(&query).await,
            Command::Now { city } => show_current(&city).await,
            Command::Forecast { city } => show_forecast(&city).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Text::new("OpenWeather API key:")
        .with_help_message("Create one for free at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key from prompt")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search_cities(query: &str) -> Result<()> {
    let candidates = cities::load_bundled()?;

    // Too-short queries get the popular default list, per ranker policy.
    if query.trim().chars().count() < search::MIN_QUERY_LEN {
        println!("Popular cities:");
        for city in cities::popular(&candidates, SEARCH_LIMIT) {
            print_candidate(&city);
        }
        return Ok(());
    }

    let ranked = search::rank(query, &candidates, SEARCH_LIMIT);
    let mut results: Vec<CityCandidate> =
        ranked.into_iter().map(|m| m.candidate).collect();

    // Thin local results: ask the geocoding fallback, when a key is around.
    if results.len() < REMOTE_FALLBACK_THRESHOLD {
        if let Ok(client) = openweather_client() {
            match client.search_cities(query, SEARCH_LIMIT).await {
                Ok(remote) => results = merge_candidates(results, remote, SEARCH_LIMIT),
                Err(err) => eprintln!("warning: remote city lookup failed: {err}"),
            }
        }
    }

    if results.is_empty() {
        println!("No cities found for \"{query}\".");
        return Ok(());
    }

    for city in &results {
        print_candidate(city);
    }
    Ok(())
}

async fn show_current(city: &str) -> Result<()> {
    let client = openweather_client()?;
    let (name, coords) = resolve_city(&client, city).await?;

    let current = client.current_weather(coords).await?;
    print_current(&name, &current);
    Ok(())
}

async fn show_forecast(city: &str) -> Result<()> {
    let client = openweather_client()?;
    let (name, coords) = resolve_city(&client, city).await?;

    let forecast = client.forecast(coords).await?;
    print_forecast(&name, &forecast);
    Ok(())
}

fn openweather_client() -> Result<OpenWeatherClient> {
    let config = Config::load()?;
    let api_key = config.resolve_api_key()?;
    Ok(OpenWeatherClient::new(api_key))
}

/// Best local match first; unknown names go through the geocoding endpoint.
async fn resolve_city(
    client: &OpenWeatherClient,
    query: &str,
) -> Result<(String, Coordinates)> {
    let candidates = cities::load_bundled()?;

    if let Some(top) = search::rank(query, &candidates, 1).into_iter().next() {
        let city = top.candidate;
        return Ok((city.display_name(), city.coordinates));
    }

    let remote = client.search_cities(query, 1).await?;
    match remote.into_iter().next() {
        Some(city) => Ok((city.display_name(), city.coordinates)),
        None => bail!("City not found: \"{query}\". Try `skycast search <name>`."),
    }
}

/// Local hits keep their rank; remote hits fill the tail, deduplicated on
/// case-insensitive (name, country).
fn merge_candidates(
    local: Vec<CityCandidate>,
    remote: Vec<CityCandidate>,
    limit: usize,
) -> Vec<CityCandidate> {
    let mut merged = local;
    for city in remote {
        let duplicate = merged.iter().any(|c| {
            c.name.eq_ignore_ascii_case(&city.name)
                && c.country.eq_ignore_ascii_case(&city.country)
        });
        if !duplicate {
            merged.push(city);
        }
    }
    merged.truncate(limit);
    merged
}

fn print_candidate(city: &CityCandidate) {
    println!(
        "  {:<40} ({:.4}, {:.4})",
        city.display_name(),
        city.coordinates.lat,
        city.coordinates.lon
    );
}

fn print_current(name: &str, current: &CurrentConditions) {
    let (symbol, description, theme) = match &current.condition {
        Some(condition) => (
            format::condition_symbol(&condition.icon),
            format::capitalize_words(&condition.description),
            format::condition_theme(&condition.main),
        ),
        None => ("🌤", "Unknown".to_string(), format::ConditionTheme::Clear),
    };

    let accent = theme_accent(theme);
    println!("{accent}{name} — {description} {symbol}\x1b[0m");
    println!(
        "  {}  (feels like {})",
        format::temperature(current.temp_c),
        format::temperature(current.feels_like_c)
    );
    println!(
        "  min {} / max {}",
        format::temperature(current.temp_min_c),
        format::temperature(current.temp_max_c)
    );
    println!(
        "  wind {} {} · humidity {} · pressure {}",
        format::wind_speed(current.wind_speed_mps),
        format::wind_direction(current.wind_deg),
        format::humidity(current.humidity_pct),
        format::pressure(current.pressure_hpa)
    );
    println!(
        "  sunrise {} · sunset {} (local time)",
        local_time(current.sunrise, current.utc_offset_secs, "%H:%M"),
        local_time(current.sunset, current.utc_offset_secs, "%H:%M")
    );
}

fn print_forecast(name: &str, forecast: &Forecast) {
    println!("5-day forecast for {name}");

    println!("\nNext 24 hours:");
    for sample in skycast_core::first_n(&forecast.samples, HOURLY_STRIP) {
        print_hourly(sample, forecast.utc_offset_secs);
    }

    println!("\nDaily:");
    for day in skycast_core::group_by_day(&forecast.samples, local_offset(forecast.utc_offset_secs))
    {
        print_day(&day, forecast.utc_offset_secs);
    }
}

fn print_hourly(sample: &ForecastSample, utc_offset_secs: i32) {
    let symbol = sample
        .condition
        .as_ref()
        .map(|c| format::condition_symbol(&c.icon))
        .unwrap_or("🌤");

    let time = DateTime::from_timestamp(sample.timestamp, 0)
        .map(|dt| local_time(dt, utc_offset_secs, "%H:%M"))
        .unwrap_or_else(|| "--:--".to_string());

    println!("  {time}  {:>4}  {symbol}", format::temperature(sample.temp_c));
}

fn print_day(day: &DaySummary, utc_offset_secs: i32) {
    let weekday = DateTime::from_timestamp(day.timestamp, 0)
        .map(|dt| local_time(dt, utc_offset_secs, "%a %d %b"))
        .unwrap_or_else(|| day.date_key.clone());

    let symbol = format::condition_symbol(&day.condition.icon);
    let rain = if day.precipitation_probability > 0.0 {
        format!("  {}% rain", (day.precipitation_probability * 100.0).round() as i64)
    } else {
        String::new()
    };

    println!(
        "  {weekday:<10}  {:>4} / {:<4}  {symbol} {}{rain}",
        format::temperature(day.temp_min_c),
        format::temperature(day.temp_max_c),
        day.condition.main,
    );
}

/// Terminal stand-in for the per-condition background the app had.
fn theme_accent(theme: format::ConditionTheme) -> &'static str {
    use format::ConditionTheme::*;
    match theme {
        Clear => "\x1b[1;33m",
        Clouds | Mist => "\x1b[1;37m",
        Rain | Drizzle => "\x1b[1;34m",
        Thunderstorm => "\x1b[1;35m",
        Snow => "\x1b[1;36m",
    }
}

fn local_offset(utc_offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| {
        FixedOffset::east_opt(0).expect("zero offset is valid")
    })
}

fn local_time(dt: DateTime<Utc>, utc_offset_secs: i32, fmt: &str) -> String {
    dt.with_timezone(&local_offset(utc_offset_secs)).format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, country: &str) -> CityCandidate {
        CityCandidate {
            name: name.to_string(),
            country: country.to_string(),
            region: None,
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            population: 0,
        }
    }

    #[test]
    fn merge_keeps_local_order_and_dedups_remote() {
        let local = vec![city("London", "GB")];
        let remote = vec![city("LONDON", "GB"), city("London", "CA")];

        let merged = merge_candidates(local, remote, 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].country, "GB");
        assert_eq!(merged[1].country, "CA");
    }

    #[test]
    fn merge_respects_limit() {
        let local = vec![city("A", "AA"), city("B", "BB")];
        let remote = vec![city("C", "CC"), city("D", "DD")];

        let merged = merge_candidates(local, remote, 3);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2].name, "C");
    }
}
