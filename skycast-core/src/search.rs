//! City search ranking.
//!
//! Pure and deterministic: the same query over the same candidate list always
//! yields the same ordered result. Callers own everything around it, such as
//! debouncing keystrokes, substituting a popular-cities default for empty
//! queries, and falling back to the geocoding lookup when too few local
//! candidates match.

use std::collections::HashMap;

use crate::model::{CityCandidate, RankedMatch};

/// Queries shorter than this (after trimming) return no matches; the caller
/// is expected to show its default list instead.
pub const MIN_QUERY_LEN: usize = 2;

// Tier bands. Within-tier adjustments are fractions of the 100-point gap so
// a candidate can never cross into a neighboring tier.
const TIER_EXACT: f64 = 1000.0;
const TIER_PREFIX: f64 = 900.0;
const TIER_SUBSTRING: f64 = 800.0;
const TIER_AFFILIATION: f64 = 700.0;
const TIER_FUZZY_CAP: f64 = 600.0;

/// Rank `candidates` against `query` and return at most `limit` matches,
/// best first, deduplicated on case-insensitive `(name, country)`.
///
/// Tier ordering: exact name > name prefix > name substring > region or
/// country substring > in-order character subsequence of the name. A query
/// with any character missing from a candidate's name (and no higher-tier
/// hit) excludes that candidate. Remaining ties break by population
/// (log-scaled) descending, then name, then country ascending.
pub fn rank(query: &str, candidates: &[CityCandidate], limit: usize) -> Vec<RankedMatch> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN || limit == 0 {
        return Vec::new();
    }
    let query = query.to_lowercase();

    // Dedup while scoring: keep the better-scoring duplicate.
    let mut best: HashMap<(String, String), RankedMatch> = HashMap::new();
    for candidate in candidates {
        let Some(score) = score_candidate(&query, candidate) else {
            continue;
        };

        let key = (candidate.name.to_lowercase(), candidate.country.to_lowercase());
        match best.get(&key) {
            Some(existing) if existing.score >= score => {}
            _ => {
                best.insert(key, RankedMatch { candidate: candidate.clone(), score });
            }
        }
    }

    let mut matches: Vec<RankedMatch> = best.into_values().collect();
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| log_population(&b.candidate).total_cmp(&log_population(&a.candidate)))
            .then_with(|| a.candidate.name.cmp(&b.candidate.name))
            // Same name can recur across countries; without this last step the
            // order would fall back to hash-map iteration order.
            .then_with(|| a.candidate.country.cmp(&b.candidate.country))
    });
    matches.truncate(limit);
    matches
}

/// Score one candidate against a lowercased, trimmed query. `None` means the
/// candidate does not match at all and is excluded from the result.
fn score_candidate(query: &str, candidate: &CityCandidate) -> Option<f64> {
    let name = candidate.name.to_lowercase();

    if name == query {
        return Some(TIER_EXACT);
    }
    if name.starts_with(query) {
        // Shorter names rank above longer ones within the tier.
        return Some(TIER_PREFIX - name.chars().count() as f64 * 0.1);
    }
    if let Some(pos) = name.find(query) {
        // Earlier match position ranks above later.
        return Some(TIER_SUBSTRING - pos as f64 * 0.1);
    }

    let region_hit = candidate
        .region
        .as_deref()
        .is_some_and(|region| region.to_lowercase().contains(query));
    if region_hit || candidate.country.to_lowercase().contains(query) {
        return Some(TIER_AFFILIATION);
    }

    subsequence_score(query, &name).map(|score| score.min(TIER_FUZZY_CAP))
}

/// In-order character subsequence match with a consecutive-run bonus.
///
/// Every query character must appear in `name` after the previous hit;
/// adjacent hits score full points, gaps score less the wider they are.
/// Longer names are slightly penalized so tight matches on short names win.
fn subsequence_score(query: &str, name: &str) -> Option<f64> {
    let chars: Vec<char> = name.chars().collect();
    let mut score = 0.0;
    let mut next = 0usize;

    for ch in query.chars() {
        let found = chars[next.min(chars.len())..].iter().position(|c| *c == ch)?;
        if found == 0 {
            score += 10.0;
        } else {
            score += (10.0 - found as f64).max(1.0);
        }
        next += found + 1;
    }

    Some((score - chars.len() as f64 * 0.1).max(1.0))
}

fn log_population(candidate: &CityCandidate) -> f64 {
    (candidate.population as f64).ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn city(name: &str, country: &str, population: u64) -> CityCandidate {
        CityCandidate {
            name: name.to_string(),
            country: country.to_string(),
            region: None,
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            population,
        }
    }

    fn city_in(name: &str, country: &str, region: &str) -> CityCandidate {
        CityCandidate { region: Some(region.to_string()), ..city(name, country, 0) }
    }

    fn names(matches: &[RankedMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.candidate.name.as_str()).collect()
    }

    #[test]
    fn exact_match_outranks_everything() {
        let candidates = vec![
            city("Parisville", "US", 50_000_000),
            city("Paris", "FR", 2_100_000),
            city("East Paris", "US", 9_000_000),
        ];

        let ranked = rank("paris", &candidates, 10);
        assert_eq!(names(&ranked), vec!["Paris", "Parisville", "East Paris"]);
    }

    #[test]
    fn prefix_outranks_substring_and_subsequence() {
        let candidates = vec![
            city("Lisbon", "PT", 500_000),
            city("London", "GB", 8_900_000),
            city("Avalon", "US", 1_200),
        ];

        // "lon" prefix-matches London, substring-matches Avalon (position 3),
        // subsequence-matches Lisbon.
        let ranked = rank("lon", &candidates, 10);
        assert_eq!(names(&ranked), vec!["London", "Avalon", "Lisbon"]);
    }

    #[test]
    fn shorter_name_wins_within_prefix_tier() {
        let candidates = vec![city("Santander", "ES", 170_000), city("Santa", "US", 1_000)];

        let ranked = rank("san", &candidates, 10);
        assert_eq!(names(&ranked), vec!["Santa", "Santander"]);
    }

    #[test]
    fn earlier_substring_position_wins() {
        let candidates =
            vec![city("Fort Yorktown", "US", 1_000), city("New York", "US", 8_300_000)];

        let ranked = rank("york", &candidates, 10);
        assert_eq!(names(&ranked), vec!["New York", "Fort Yorktown"]);
    }

    #[test]
    fn region_hits_rank_below_name_matches_but_above_fuzzy() {
        let candidates = vec![
            city_in("Buffalo", "US", "NY"),
            city("Nyon", "CH", 23_000),
            city("Nassau Bay", "US", 4_000),
        ];

        // Nyon: name prefix. Buffalo: region hit only. Nassau Bay: the query
        // is merely a subsequence of the name.
        let ranked = rank("ny", &candidates, 10);
        assert_eq!(names(&ranked), vec!["Nyon", "Buffalo", "Nassau Bay"]);
    }

    #[test]
    fn query_with_missing_character_excludes_candidate() {
        let candidates = vec![city("Oslo", "NO", 700_000)];
        assert!(rank("oslox", &candidates, 10).is_empty());
    }

    #[test]
    fn no_match_yields_empty_not_error() {
        let candidates = vec![city("Tokyo", "JP", 13_900_000)];
        assert!(rank("zzqq", &candidates, 10).is_empty());
    }

    #[test]
    fn short_query_yields_empty() {
        let candidates = vec![city("Rome", "IT", 2_800_000)];
        assert!(rank("r", &candidates, 10).is_empty());
        assert!(rank("  r  ", &candidates, 10).is_empty());
        assert!(rank("", &candidates, 10).is_empty());
    }

    #[test]
    fn output_is_capped_and_deduplicated() {
        let candidates = vec![
            city("Springfield", "US", 100_000),
            city("Springfield", "US", 100_000),
            city("Springville", "US", 30_000),
            city("Spring Hill", "US", 40_000),
            city("Springdale", "US", 80_000),
        ];

        let ranked = rank("spring", &candidates, 3);
        assert_eq!(ranked.len(), 3);

        let full = rank("spring", &candidates, 10);
        let springfield_hits =
            full.iter().filter(|m| m.candidate.name == "Springfield").count();
        assert_eq!(springfield_hits, 1);
    }

    #[test]
    fn population_breaks_ties_then_name() {
        let candidates = vec![
            city("Bergen", "NO", 280_000),
            city("Berlin", "DE", 3_600_000),
            city("Bernau", "DE", 3_600_000),
        ];

        // All three are 6-char prefix matches for "ber": identical scores.
        let ranked = rank("ber", &candidates, 10);
        assert_eq!(names(&ranked), vec!["Berlin", "Bernau", "Bergen"]);
    }

    #[test]
    fn fully_tied_candidates_order_by_country() {
        // Same name, same (zero) population, different countries: the shape
        // geocoding results come back in. Order must not depend on hash-map
        // iteration.
        let candidates = vec![
            city("London", "US", 0),
            city("London", "GB", 0),
            city("London", "KE", 0),
            city("London", "CA", 0),
        ];

        let countries = |matches: &[RankedMatch]| -> Vec<String> {
            matches.iter().map(|m| m.candidate.country.clone()).collect()
        };

        let first = rank("london", &candidates, 10);
        assert_eq!(countries(&first), vec!["CA", "GB", "KE", "US"]);
        for _ in 0..50 {
            let again = rank("london", &candidates, 10);
            assert_eq!(countries(&first), countries(&again));
        }
    }

    #[test]
    fn dedup_keeps_higher_scoring_duplicate() {
        // Both entries share (name, country). "tana" is only a subsequence of
        // the name, but a substring of one entry's region, so that entry lands
        // in the higher affiliation tier.
        let with_region = city_in("Tarzana", "US", "Montana");
        let without_region = city("Tarzana", "US", 0);

        for candidates in [
            vec![with_region.clone(), without_region.clone()],
            vec![without_region, with_region],
        ] {
            let ranked = rank("tana", &candidates, 10);
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].candidate.region.as_deref(), Some("Montana"));
        }
    }

    #[test]
    fn ranking_is_deterministic() {
        let candidates = vec![
            city("London", "GB", 8_900_000),
            city("Londrina", "BR", 575_000),
            city("Lisbon", "PT", 500_000),
            city_in("New London", "US", "CT"),
        ];

        let first = rank("lon", &candidates, 10);
        for _ in 0..10 {
            let again = rank("lon", &candidates, 10);
            assert_eq!(names(&first), names(&again));
            let scores_a: Vec<f64> = first.iter().map(|m| m.score).collect();
            let scores_b: Vec<f64> = again.iter().map(|m| m.score).collect();
            assert_eq!(scores_a, scores_b);
        }
    }

    #[test]
    fn consecutive_subsequence_beats_scattered() {
        // Both only subsequence-match "lbn": Lisbon has the tighter run.
        let candidates =
            vec![city("Lisbon", "PT", 500_000), city("Le Grand Bornand", "FR", 2_000)];

        let ranked = rank("lbn", &candidates, 10);
        assert_eq!(ranked[0].candidate.name, "Lisbon");
    }
}
