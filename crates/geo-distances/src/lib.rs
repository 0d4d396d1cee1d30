//! Great-circle distance and branch-pruning geometry for points on the
//! surface of the Earth.
//!
//! This crate provides the two metric primitives that a spatial index needs
//! over `(latitude, longitude)` coordinates:
//!
//! - [`great_circle_km`]: the true shortest-path distance between two points
//!   on a sphere.
//! - [`axis_lower_bound_km`]: a cheap, admissible lower bound on the distance
//!   from a query point to a splitting hyperplane, used to decide whether a
//!   branch of a spatial tree can be safely pruned.

mod geodesy;

pub use geodesy::{axis_lower_bound_km, great_circle_km, Axis, EARTH_RADIUS_KM};
