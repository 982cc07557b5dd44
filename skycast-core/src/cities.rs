//! Bundled city dataset.
//!
//! A static slice of major world cities embedded in the binary, parsed once
//! and handed to callers as a plain `Vec`. Nothing here is a hidden global:
//! the ranker takes the candidate list as an argument, so tests and callers
//! are free to substitute their own.

use anyhow::{Context, Result};

use crate::model::CityCandidate;

const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// Parse the embedded dataset.
pub fn load_bundled() -> Result<Vec<CityCandidate>> {
    serde_json::from_str(BUNDLED_CITIES).context("Failed to parse bundled city dataset")
}

/// Top `n` candidates by population, for the empty-query default list.
pub fn popular(candidates: &[CityCandidate], n: usize) -> Vec<CityCandidate> {
    let mut sorted: Vec<CityCandidate> = candidates.to_vec();
    sorted.sort_by(|a, b| {
        b.population.cmp(&a.population).then_with(|| a.name.cmp(&b.name))
    });
    sorted.truncate(n);
    sorted
}
