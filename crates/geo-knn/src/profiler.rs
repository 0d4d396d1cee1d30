//! Latency profiling: runs a batch of synthetic queries against a built
//! index and summarizes how long they took.

use std::time::Instant;

use rand::Rng;

use crate::adapter::{query_with, QueryRequest};
use crate::error::Result;
use crate::store::RecordStore;

/// Which latitude band synthetic queries are drawn from.
///
/// The reference profiling routine samples latitude from a halved range;
/// the full range is offered as an explicit alternative rather than
/// silently treating the halved range as the only correct choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeRange {
    /// `[-45, 45]`, matching the reference profiling routine.
    Halved,
    /// `[-90, 90]`, the full valid latitude range.
    Full,
}

impl LatitudeRange {
    const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Halved => (-45.0, 45.0),
            Self::Full => (-90.0, 90.0),
        }
    }
}

/// Summary statistics over a batch of query latencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileReport {
    /// Number of queries run.
    pub count: usize,
    /// Fastest query, in seconds.
    pub min_secs: f64,
    /// Slowest query, in seconds.
    pub max_secs: f64,
    /// Mean query latency, in seconds.
    pub mean_secs: f64,
    /// Sample variance (divisor n - 1) of query latency, in seconds squared.
    pub variance_secs: f64,
    /// Fraction of queries that took longer than one second.
    pub fraction_over_one_second: f64,
}

/// Runs synthetic query batches against a built index for latency
/// profiling.
pub struct Profiler<'a, S> {
    store: &'a S,
    latitude_range: LatitudeRange,
}

impl<'a, S: RecordStore> Profiler<'a, S> {
    /// Creates a profiler using the reference service's halved latitude
    /// range.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store, latitude_range: LatitudeRange::Halved }
    }

    /// Creates a profiler sampling from an explicit latitude range.
    #[must_use]
    pub fn with_latitude_range(store: &'a S, latitude_range: LatitudeRange) -> Self {
        Self { store, latitude_range }
    }

    /// Runs `num_loops` synthetic queries, each with the given `k` and
    /// `age_tolerance`, and returns latency summary statistics.
    ///
    /// Query points are drawn uniformly at random: latitude from this
    /// profiler's configured range, longitude from `[-180, 180]`, and age
    /// from `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns an error if any individual query fails (for example, if the
    /// index has not been built).
    pub fn run(&self, num_loops: usize, k: usize, age_tolerance: i64) -> Result<ProfileReport> {
        let mut rng = rand::rng();
        let (lat_lo, lat_hi) = self.latitude_range.bounds();
        let mut latencies = Vec::with_capacity(num_loops);

        for _ in 0..num_loops {
            let request = QueryRequest {
                latitude: rng.random_range(lat_lo..=lat_hi),
                longitude: rng.random_range(-180.0..=180.0),
                age: rng.random_range(0..=100),
            };
            let start = Instant::now();
            query_with(self.store, &request, k, age_tolerance)?;
            latencies.push(start.elapsed().as_secs_f64());
        }

        Ok(summarize(&latencies))
    }
}

fn summarize(latencies: &[f64]) -> ProfileReport {
    let count = latencies.len();
    if count == 0 {
        return ProfileReport {
            count: 0,
            min_secs: 0.0,
            max_secs: 0.0,
            mean_secs: 0.0,
            variance_secs: 0.0,
            fraction_over_one_second: 0.0,
        };
    }

    let min_secs = latencies.iter().copied().fold(f64::INFINITY, f64::min);
    let max_secs = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    #[allow(clippy::cast_precision_loss)]
    let count_f64 = count as f64;
    let mean_secs = latencies.iter().sum::<f64>() / count_f64;
    // Sample variance (divisor n - 1), matching scipy.stats.describe; a
    // single-sample batch has no defined sample variance.
    let variance_secs = if count > 1 {
        #[allow(clippy::cast_precision_loss)]
        let denom = (count - 1) as f64;
        latencies.iter().map(|v| (v - mean_secs).powi(2)).sum::<f64>() / denom
    } else {
        0.0
    };
    let fraction_over_one_second = latencies.iter().filter(|v| **v >= 1.0).count() as f64 / count_f64;

    ProfileReport {
        count,
        min_secs,
        max_secs,
        mean_secs,
        variance_secs,
        fraction_over_one_second,
    }
}
