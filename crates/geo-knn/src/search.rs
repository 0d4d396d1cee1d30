//! Age-filtered bounded k-nearest-neighbor search over the k-d tree.

use geo_distances::{axis_lower_bound_km, great_circle_km, Axis};

use crate::builder::ROOT_ID_KEY;
use crate::error::{validate_coordinate, validate_age, validate_k, Error, InvalidInput, Result};
use crate::heap::BoundedTopK;
use crate::record::{Record, Side};
use crate::store::RecordStore;

/// One result of a kNN search: a record's public fields plus its distance
/// from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// The record's stable identifier.
    pub id: String,
    /// Great-circle distance from the query point, in kilometers.
    pub distance_km: f64,
    /// The record's latitude.
    pub latitude: f64,
    /// The record's longitude.
    pub longitude: f64,
    /// The record's age.
    pub age: i64,
    /// The record's display name.
    pub name: String,
}

/// Runs bounded kNN queries against a built index.
pub struct KnnSearcher<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> KnnSearcher<'a, S> {
    /// Creates a searcher over `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Finds up to `k` records within `age_tolerance` years of `age`,
    /// nearest to `(latitude, longitude)` by great-circle distance, sorted
    /// ascending by distance.
    ///
    /// Age filtering happens after a record's distance is computed and
    /// never affects which subtrees are explored: pruning decisions are
    /// made purely on geometry, so a query can legitimately return fewer
    /// than `k` neighbors even when more than `k` records exist in range
    /// geometrically, if too few of them pass the age filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the coordinate is non-finite or
    /// out of range, `age` is negative, or `k` is zero. Returns
    /// [`Error::NotBuilt`] if the index has no root yet. Returns
    /// [`Error::DataIntegrity`] if a child pointer in the tree does not
    /// resolve to a stored record.
    pub fn search(&self, latitude: f64, longitude: f64, k: usize, age: i64, age_tolerance: i64) -> Result<Vec<Neighbor>> {
        validate_coordinate(latitude, longitude)?;
        validate_age(age)?;
        #[allow(clippy::cast_possible_wrap)]
        validate_k(k as i64)?;

        let root_id = self.store.get_scalar(ROOT_ID_KEY)?.ok_or(Error::NotBuilt)?;

        let mut frontier: BoundedTopK<Neighbor> = BoundedTopK::new(k);
        self.visit(&root_id, 0, latitude, longitude, age, age_tolerance, &mut frontier)?;
        Ok(frontier.drain_sorted_ascending().into_iter().map(|(neighbor, _)| neighbor).collect())
    }

    fn fetch(&self, id: &str) -> Result<Record> {
        self.store.get_record(id)?.ok_or_else(|| Error::DataIntegrity {
            referencing_id: id.to_string(),
            missing_id: id.to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        id: &str,
        depth: usize,
        q_lat: f64,
        q_lon: f64,
        age: i64,
        age_tolerance: i64,
        frontier: &mut BoundedTopK<Neighbor>,
    ) -> Result<()> {
        let record = self.fetch(id)?;
        let distance = great_circle_km(q_lat, q_lon, record.latitude, record.longitude);

        if (record.age - age).abs() <= age_tolerance {
            frontier.offer(
                Neighbor {
                    id: record.id.clone(),
                    distance_km: distance,
                    latitude: record.latitude,
                    longitude: record.longitude,
                    age: record.age,
                    name: record.name.clone(),
                },
                distance,
            );
        }

        let axis = Axis::at_depth(depth);
        let record_value = record.axis_value(axis);
        let query_value = axis.value_of(q_lat, q_lon);
        let (near_side, far_side) = if query_value < record_value {
            (Side::Left, Side::Right)
        } else {
            (Side::Right, Side::Left)
        };

        if let Some(near_id) = record.child(near_side).clone() {
            self.visit(&near_id, depth + 1, q_lat, q_lon, age, age_tolerance, frontier)?;
        }

        let far_is_worth_exploring = if frontier.is_full() {
            let lower_bound = axis_lower_bound_km((q_lat, q_lon), (record.latitude, record.longitude), axis);
            match frontier.peek_max_score() {
                Some(worst) => lower_bound < worst,
                None => true,
            }
        } else {
            true
        };

        if far_is_worth_exploring {
            if let Some(far_id) = record.child(far_side).clone() {
                self.visit(&far_id, depth + 1, q_lat, q_lon, age, age_tolerance, frontier)?;
            }
        }

        Ok(())
    }
}
