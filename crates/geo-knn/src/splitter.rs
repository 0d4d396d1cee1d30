//! Pivot selection for k-d tree construction: exact and sampled median
//! splitting.

use std::cmp::Ordering;

use geo_distances::Axis;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::BuildConfig;
use crate::record::Record;

/// The result of splitting one candidate set along one axis: a pivot record
/// to place at this node, plus the two partitions to recurse into.
#[derive(Debug)]
pub struct SplitOutcome {
    /// The record chosen to occupy this node.
    pub pivot: Record,
    /// Records whose axis value is `<=` the pivot's.
    pub left: Vec<Record>,
    /// Records whose axis value is `>` the pivot's.
    pub right: Vec<Record>,
}

/// Chooses a pivot for a candidate set, either exactly or approximately
/// depending on [`BuildConfig`].
pub struct MedianSplitter;

impl MedianSplitter {
    /// Splits `records` along `axis`, picking the exact-median path or the
    /// sampled-median path per `config.should_sample`.
    ///
    /// `records` must be non-empty.
    pub fn split(records: Vec<Record>, axis: Axis, config: &BuildConfig, rng: &mut impl Rng) -> SplitOutcome {
        debug_assert!(!records.is_empty(), "cannot split an empty candidate set");
        if config.should_sample(records.len()) {
            Self::split_sampled(records, axis, config, rng)
        } else {
            Self::split_exact(records, axis)
        }
    }

    /// Sorts the full candidate set by axis value and takes the exact
    /// middle element as the pivot.
    fn split_exact(mut records: Vec<Record>, axis: Axis) -> SplitOutcome {
        records.sort_by(|a, b| cmp_axis(a, b, axis));
        let mid = records.len() / 2;
        let right = records.split_off(mid);
        let mut right = right.into_iter();
        let pivot = right.next().expect("split_off leaves at least the pivot");
        SplitOutcome {
            pivot,
            left: records,
            right: right.collect(),
        }
    }

    /// Draws a random sample, takes its median axis value as a threshold,
    /// and partitions the full candidate set around that threshold.
    ///
    /// The first record found at the threshold becomes the pivot; all
    /// other records with that exact axis value fall into `left`, matching
    /// the reference construction routine's behavior on coordinate ties.
    fn split_sampled(records: Vec<Record>, axis: Axis, config: &BuildConfig, rng: &mut impl Rng) -> SplitOutcome {
        let sample_size = config.sample_size.min(records.len());
        let mut sample: Vec<f64> = records
            .choose_multiple(rng, sample_size)
            .map(|r| r.axis_value(axis))
            .collect();
        sample.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let threshold = sample[sample.len() / 2];

        let mut left = Vec::with_capacity(records.len());
        let mut right = Vec::with_capacity(records.len());
        let mut pivot = None;
        for record in records {
            let value = record.axis_value(axis);
            if pivot.is_none() && (value - threshold).abs() < f64::EPSILON {
                pivot = Some(record);
            } else if value <= threshold {
                left.push(record);
            } else {
                right.push(record);
            }
        }

        let pivot = pivot.unwrap_or_else(|| {
            // No sampled record's exact value survived in the full set (can
            // happen with floating-point sampling jitter); fall back to the
            // closest candidate on the left.
            left.pop().expect("candidate set is non-empty")
        });

        SplitOutcome { pivot, left, right }
    }
}

fn cmp_axis(a: &Record, b: &Record, axis: Axis) -> Ordering {
    a.axis_value(axis).partial_cmp(&b.axis_value(axis)).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MedianMode;

    fn record(id: &str, lat: f64) -> Record {
        Record::new(id, lat, 0.0, 0, id)
    }

    #[test]
    fn exact_split_picks_the_middle_value() {
        let records = vec![record("a", 1.0), record("b", 3.0), record("c", 2.0)];
        let outcome = MedianSplitter::split_exact(records, Axis::Latitude);
        assert!((outcome.pivot.latitude - 2.0).abs() < 1e-12);
        assert_eq!(outcome.left.len(), 1);
        assert_eq!(outcome.right.len(), 1);
    }

    #[test]
    fn exact_split_partitions_are_ordered_correctly() {
        let records = vec![record("a", 5.0), record("b", 1.0), record("c", 9.0), record("d", 3.0)];
        let outcome = MedianSplitter::split_exact(records, Axis::Latitude);
        for r in &outcome.left {
            assert!(r.latitude <= outcome.pivot.latitude);
        }
        for r in &outcome.right {
            assert!(r.latitude > outcome.pivot.latitude);
        }
    }

    #[test]
    fn sampled_split_accounts_for_every_record() {
        let config = BuildConfig {
            median_mode: MedianMode::Sampled,
            sample_size: 5,
            sample_threshold: 0,
            ..BuildConfig::default()
        };
        let mut rng = rand::rng();
        let records: Vec<Record> = (0..50).map(|i| record(&i.to_string(), f64::from(i))).collect();
        let total = records.len();
        let outcome = MedianSplitter::split(records, Axis::Latitude, &config, &mut rng);
        assert_eq!(outcome.left.len() + outcome.right.len() + 1, total);
        for r in &outcome.left {
            assert!(r.latitude <= outcome.pivot.latitude);
        }
        for r in &outcome.right {
            assert!(r.latitude > outcome.pivot.latitude);
        }
    }

    #[test]
    fn config_gate_selects_exact_below_threshold() {
        let config = BuildConfig::default();
        let records = vec![record("a", 1.0), record("b", 2.0)];
        let mut rng = rand::rng();
        let outcome = MedianSplitter::split(records, Axis::Latitude, &config, &mut rng);
        assert!((outcome.pivot.latitude - 2.0).abs() < 1e-12);
    }
}
