//! Single-record insertion into an already-built (or empty) index.
//!
//! Insertion is non-balancing: a new record always becomes a leaf at the
//! position a plain k-d tree descent would put it, with no rebalancing of
//! existing nodes. Repeated insertion without periodic rebuilding can
//! therefore degrade search performance on adversarial input orderings;
//! this is accepted, per the dynamic-rebalancing non-goal.

use geo_distances::Axis;

use crate::builder::ROOT_ID_KEY;
use crate::error::{validate_age, validate_coordinate, Error, Result};
use crate::record::{Record, Side};
use crate::store::RecordStore;

/// Looks up a single record by id.
pub fn find_item<S: RecordStore>(store: &S, id: &str) -> Result<Option<Record>> {
    store.get_record(id)
}

/// Inserts `record` into the index rooted in `store`.
///
/// If the index is currently empty, `record` becomes the root and the
/// function returns without any tree descent. Otherwise it descends from
/// the root, alternating axes by depth exactly as search does, until it
/// finds an empty child slot, and places the record there.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the record's coordinate or age is
/// malformed. Returns [`Error::DataIntegrity`] if a child pointer
/// encountered during descent does not resolve to a stored record.
pub fn insert<S: RecordStore>(store: &S, record: Record) -> Result<()> {
    validate_coordinate(record.latitude, record.longitude)?;
    validate_age(record.age)?;

    let Some(root_id) = store.get_scalar(ROOT_ID_KEY)? else {
        store.put_record(&record)?;
        store.set_scalar(ROOT_ID_KEY, &record.id)?;
        return Ok(());
    };

    let mut current_id = root_id;
    let mut depth = 0usize;
    loop {
        let current = store.get_record(&current_id)?.ok_or_else(|| Error::DataIntegrity {
            referencing_id: current_id.clone(),
            missing_id: current_id.clone(),
        })?;

        let axis = Axis::at_depth(depth);
        let side = if record.axis_value(axis) < current.axis_value(axis) {
            Side::Left
        } else {
            Side::Right
        };

        match current.child(side).clone() {
            Some(child_id) => {
                current_id = child_id;
                depth += 1;
            }
            None => {
                store.put_record(&record)?;
                store.update_field(&current_id, side, Some(record.id.clone()))?;
                return Ok(());
            }
        }
    }
}
