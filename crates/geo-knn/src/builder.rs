//! Builds the k-d tree index into a [`RecordStore`] by repeated median
//! splitting.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo_distances::Axis;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::record::{Record, Side};
use crate::splitter::MedianSplitter;
use crate::store::RecordStore;

/// The root scalar key under which a built index's root record id is
/// stored.
pub const ROOT_ID_KEY: &str = "root_id";

/// Builds an index into a store, one median split at a time.
///
/// Once a node's two candidate sets together reach
/// [`BuildConfig::parallel_threshold`], its two subtrees are built
/// concurrently with `rayon::join`; below it, they are built one after the
/// other. Either way, the store only ever sees one writer per record: the
/// two sides never share a candidate.
pub struct IndexBuilder<'a, S> {
    store: &'a S,
    config: BuildConfig,
}

impl<'a, S: RecordStore + Sync> IndexBuilder<'a, S> {
    /// Creates a builder that will write into `store` under `config`.
    #[must_use]
    pub fn new(store: &'a S, config: BuildConfig) -> Self {
        Self { store, config }
    }

    /// Builds the index from `records`, placing each one via median
    /// splitting and recording parent-to-child pointers as it goes.
    ///
    /// An empty `records` leaves the store's `root_id` scalar unset.
    pub fn build(&self, records: Vec<Record>) -> Result<()> {
        self.store.begin_construction()?;

        if records.is_empty() {
            self.store.end_construction()?;
            ftlog::info!("index build complete: 0 records, depth 0");
            return Ok(());
        }

        let total = records.len();
        let placed = AtomicUsize::new(0);
        let max_depth = AtomicUsize::new(0);

        let mut rng = rand::rng();
        let outcome = MedianSplitter::split(records, Axis::at_depth(0), &self.config, &mut rng);
        self.store.put_record(&outcome.pivot)?;
        self.store.set_scalar(ROOT_ID_KEY, &outcome.pivot.id)?;
        placed.fetch_add(1, Ordering::Relaxed);

        self.build_children(&outcome.pivot.id, 0, outcome.left, outcome.right, &placed, &max_depth, total)?;

        self.store.end_construction()?;
        ftlog::info!(
            "index build complete: {} records, depth {}",
            placed.load(Ordering::Relaxed),
            max_depth.load(Ordering::Relaxed)
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn build_children(
        &self,
        parent_id: &str,
        depth: usize,
        left: Vec<Record>,
        right: Vec<Record>,
        placed: &AtomicUsize,
        max_depth: &AtomicUsize,
        total: usize,
    ) -> Result<()> {
        if left.len() + right.len() >= self.config.parallel_threshold {
            let (left_result, right_result) = rayon::join(
                || self.build_subtree(parent_id, Side::Left, depth + 1, left, placed, max_depth, total),
                || self.build_subtree(parent_id, Side::Right, depth + 1, right, placed, max_depth, total),
            );
            left_result?;
            right_result?;
        } else {
            self.build_subtree(parent_id, Side::Left, depth + 1, left, placed, max_depth, total)?;
            self.build_subtree(parent_id, Side::Right, depth + 1, right, placed, max_depth, total)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn build_subtree(
        &self,
        parent_id: &str,
        side: Side,
        depth: usize,
        records: Vec<Record>,
        placed: &AtomicUsize,
        max_depth: &AtomicUsize,
        total: usize,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut rng = rand::rng();
        let outcome = MedianSplitter::split(records, Axis::at_depth(depth), &self.config, &mut rng);
        self.store.put_record(&outcome.pivot)?;
        self.store.update_field(parent_id, side, Some(outcome.pivot.id.clone()))?;

        let placed_so_far = placed.fetch_add(1, Ordering::Relaxed) + 1;
        max_depth.fetch_max(depth, Ordering::Relaxed);
        if placed_so_far % self.config.log_every == 0 {
            ftlog::info!("index build progress: {placed_so_far}/{total} records placed");
        }

        self.build_children(&outcome.pivot.id, depth, outcome.left, outcome.right, placed, max_depth, total)
    }
}
