//! Forecast aggregation: reduce the flat 3-hour sample feed into one summary
//! per calendar day for the daily strip, plus a trivial slice helper for the
//! hourly strip.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::model::{Condition, DaySummary, ForecastSample};

/// Group chronological 3-hour samples into one [`DaySummary`] per calendar
/// day, using `utc_offset` (the forecast location's shift from UTC) to decide
/// which day a sample belongs to.
///
/// Per day: min of sample minima, max of sample maxima, the condition whose
/// `main` value occurs in the most samples (earliest occurrence wins ties),
/// and the maximum probability of precipitation. Days come out in first-seen
/// chronological order.
///
/// Malformed samples (no condition record, or a timestamp outside the
/// representable range) are skipped rather than failing the whole call.
pub fn group_by_day(samples: &[ForecastSample], utc_offset: FixedOffset) -> Vec<DaySummary> {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in samples {
        let Some(condition) = &sample.condition else {
            debug!(timestamp = sample.timestamp, "skipping sample without condition record");
            continue;
        };
        let Some(utc) = DateTime::from_timestamp(sample.timestamp, 0) else {
            debug!(timestamp = sample.timestamp, "skipping sample with out-of-range timestamp");
            continue;
        };

        let date_key = utc.with_timezone(&utc_offset).format("%Y-%m-%d").to_string();
        match buckets.iter_mut().find(|b| b.date_key == date_key) {
            Some(bucket) => bucket.absorb(sample, condition),
            None => buckets.push(DayBucket::seed(date_key, sample, condition)),
        }
    }

    buckets.into_iter().map(DayBucket::finish).collect()
}

/// First `n` samples, for the hourly strip. Returns all of them when fewer
/// than `n` exist.
pub fn first_n(samples: &[ForecastSample], n: usize) -> &[ForecastSample] {
    &samples[..samples.len().min(n)]
}

/// Accumulator for one calendar day.
struct DayBucket {
    date_key: String,
    timestamp: i64,
    temp_min_c: f64,
    temp_max_c: f64,
    precipitation_probability: f64,
    sample_count: usize,
    /// Per distinct `main` value, in first-seen order: occurrence count and
    /// the full condition record of its first sample.
    conditions: Vec<(usize, Condition)>,
}

impl DayBucket {
    fn seed(date_key: String, sample: &ForecastSample, condition: &Condition) -> Self {
        Self {
            date_key,
            timestamp: sample.timestamp,
            temp_min_c: sample.temp_min_c,
            temp_max_c: sample.temp_max_c,
            precipitation_probability: sample.precipitation_probability,
            sample_count: 1,
            conditions: vec![(1, condition.clone())],
        }
    }

    fn absorb(&mut self, sample: &ForecastSample, condition: &Condition) {
        self.temp_min_c = self.temp_min_c.min(sample.temp_min_c);
        self.temp_max_c = self.temp_max_c.max(sample.temp_max_c);
        self.precipitation_probability =
            self.precipitation_probability.max(sample.precipitation_probability);
        self.sample_count += 1;

        match self.conditions.iter_mut().find(|(_, c)| c.main == condition.main) {
            Some((count, _)) => *count += 1,
            None => self.conditions.push((1, condition.clone())),
        }
    }

    fn finish(self) -> DaySummary {
        // Strictly-greater keeps the earliest occurrence on ties.
        let mut winner = 0;
        for (i, (count, _)) in self.conditions.iter().enumerate() {
            if *count > self.conditions[winner].0 {
                winner = i;
            }
        }

        DaySummary {
            date_key: self.date_key,
            timestamp: self.timestamp,
            temp_min_c: self.temp_min_c,
            temp_max_c: self.temp_max_c,
            condition: self.conditions[winner].1.clone(),
            precipitation_probability: self.precipitation_probability,
            sample_count: self.sample_count,
        }
    }
}
