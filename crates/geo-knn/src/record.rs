//! The atomic entity stored in the index: a person with a location and age.

use geo_distances::Axis;

/// A single person in the population: a stable identifier, a geographic
/// coordinate, an age, a name, and (once placed in the tree) pointers to its
/// two children.
///
/// Records are created once during dataset load, mutated exactly once during
/// index construction (when `left_id`/`right_id` are assigned), and
/// thereafter immutable for the lifetime of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stable identifier, unique within the dataset.
    pub id: String,
    /// Latitude in decimal degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in decimal degrees, `[-180, 180]`.
    pub longitude: f64,
    /// Age in whole years; never negative.
    pub age: i64,
    /// Arbitrary display text.
    pub name: String,
    /// Identifier of the left child, or `None` if absent.
    pub left_id: Option<String>,
    /// Identifier of the right child, or `None` if absent.
    pub right_id: Option<String>,
}

impl Record {
    /// Creates a new, un-placed record with no children.
    #[must_use]
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, age: i64, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            age,
            name: name.into(),
            left_id: None,
            right_id: None,
        }
    }

    /// Returns this record's value along the given splitting axis.
    #[must_use]
    pub fn axis_value(&self, axis: Axis) -> f64 {
        axis.value_of(self.latitude, self.longitude)
    }

    /// Returns the `(latitude, longitude)` pair for this record.
    #[must_use]
    pub const fn coordinate(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Returns the child identifier on the given side.
    #[must_use]
    pub const fn child(&self, side: Side) -> &Option<String> {
        match side {
            Side::Left => &self.left_id,
            Side::Right => &self.right_id,
        }
    }

    /// Sets the child identifier on the given side.
    pub fn set_child(&mut self, side: Side, id: Option<String>) {
        match side {
            Side::Left => self.left_id = id,
            Side::Right => self.right_id = id,
        }
    }
}

/// Which child of a node is being referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left child: axis value `<=` the node's.
    Left,
    /// The right child: axis value `>` the node's.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_children() {
        let r = Record::new("0", 40.3, 13.3, 18, "hamza harkous");
        assert_eq!(r.left_id, None);
        assert_eq!(r.right_id, None);
        assert_eq!(r.coordinate(), (40.3, 13.3));
    }

    #[test]
    fn axis_value_selects_the_right_coordinate() {
        let r = Record::new("0", 40.3, 13.3, 18, "hamza harkous");
        assert!((r.axis_value(Axis::Latitude) - 40.3).abs() < 1e-12);
        assert!((r.axis_value(Axis::Longitude) - 13.3).abs() < 1e-12);
    }

    #[test]
    fn set_child_updates_the_right_side() {
        let mut r = Record::new("0", 0.0, 0.0, 1, "x");
        r.set_child(Side::Left, Some("1".to_string()));
        r.set_child(Side::Right, Some("2".to_string()));
        assert_eq!(r.child(Side::Left), &Some("1".to_string()));
        assert_eq!(r.child(Side::Right), &Some("2".to_string()));
    }
}
