//! Plain-data configuration for index construction and storage backend
//! selection.

/// How a splitting pivot is chosen for a set of candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianMode {
    /// Sort the full candidate set and take the exact middle element.
    Exact,
    /// Draw a random sample and use its median as an approximate pivot.
    ///
    /// Only used once the candidate set reaches [`BuildConfig::sample_threshold`].
    Sampled,
}

/// Tunables for [`crate::builder::IndexBuilder`].
///
/// The sampled-median path exists purely as a performance trade-off for
/// large candidate sets; `sample_threshold` defaults to five times
/// `sample_size`, matching the ratio the reference construction routine uses
/// before it switches off the exact path.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Which pivot-selection strategy to use once a candidate set reaches
    /// `sample_threshold`; below it, [`MedianMode::Exact`] is always used
    /// regardless of this field.
    pub median_mode: MedianMode,
    /// Number of records to draw when sampling for an approximate median.
    pub sample_size: usize,
    /// Candidate-set size at or above which the sampled path is used.
    pub sample_threshold: usize,
    /// Number of records to stage in [`crate::store::ConstructionStore`]
    /// before flushing to the underlying store.
    pub flush_batch_size: usize,
    /// How often (in pivots placed) to emit a build-progress log line.
    pub log_every: usize,
    /// Combined size of a node's two candidate sets at or above which its
    /// two subtrees are built concurrently with `rayon::join` rather than
    /// one after the other.
    pub parallel_threshold: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            median_mode: MedianMode::Sampled,
            sample_size: 10_000,
            sample_threshold: 50_000,
            flush_batch_size: 100_000,
            log_every: 10_000,
            parallel_threshold: 1_000,
        }
    }
}

impl BuildConfig {
    /// Returns whether a candidate set of the given size should use the
    /// sampled-median path under this configuration.
    #[must_use]
    pub fn should_sample(&self, candidate_count: usize) -> bool {
        self.median_mode == MedianMode::Sampled && candidate_count >= self.sample_threshold
    }
}

/// Which [`crate::store::RecordStore`] backend to construct.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    /// An in-process, `RwLock`-guarded map. No external dependency.
    InProcess,
    /// A Redis-like external key-value store, reached over `connection_url`.
    ///
    /// Only constructible when this crate is built with the `external-store`
    /// feature.
    #[cfg(feature = "external-store")]
    External {
        /// A `redis`-style connection URL, e.g. `redis://127.0.0.1:6379`.
        connection_url: String,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::InProcess
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildConfig, MedianMode};

    #[test]
    fn default_threshold_is_five_times_sample_size() {
        let cfg = BuildConfig::default();
        assert_eq!(cfg.sample_threshold, cfg.sample_size * 5);
    }

    #[test]
    fn exact_mode_never_samples() {
        let cfg = BuildConfig {
            median_mode: MedianMode::Exact,
            ..BuildConfig::default()
        };
        assert!(!cfg.should_sample(1_000_000));
    }

    #[test]
    fn sampled_mode_respects_threshold() {
        let cfg = BuildConfig::default();
        assert!(!cfg.should_sample(cfg.sample_threshold - 1));
        assert!(cfg.should_sample(cfg.sample_threshold));
    }
}
