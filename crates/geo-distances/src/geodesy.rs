//! Haversine great-circle distance and axis-aligned pruning bounds.

/// Mean radius of the Earth, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The two axes a geographic k-d tree alternates over.
///
/// `axis = depth % 2` maps depth 0, 2, 4, ... to [`Axis::Latitude`] and depth
/// 1, 3, 5, ... to [`Axis::Longitude`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Splits on latitude.
    Latitude,
    /// Splits on longitude.
    Longitude,
}

impl Axis {
    /// Returns the axis for the given tree depth, with the root at depth 0.
    #[must_use]
    pub const fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Self::Latitude
        } else {
            Self::Longitude
        }
    }

    /// Returns the next axis in the round-robin rotation.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Latitude => Self::Longitude,
            Self::Longitude => Self::Latitude,
        }
    }

    /// Projects out this axis' coordinate from a `(latitude, longitude)` pair.
    #[must_use]
    pub const fn value_of(self, lat: f64, lon: f64) -> f64 {
        match self {
            Self::Latitude => lat,
            Self::Longitude => lon,
        }
    }
}

/// Computes the great-circle (haversine) distance between two points on a
/// sphere of radius [`EARTH_RADIUS_KM`].
///
/// Inputs are in decimal degrees. The result is always non-negative and is
/// symmetric in its two endpoints up to floating-point rounding.
///
/// # Examples
///
/// ```
/// use geo_distances::great_circle_km;
///
/// let d = great_circle_km(0.0, 0.0, 0.0, 0.0);
/// assert!(d.abs() < 1e-9);
/// ```
#[must_use]
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_KM * c
}

/// A lower bound on the great-circle distance from `query` to any point lying
/// on the splitting hyperplane of `pivot` along `axis`.
///
/// This is computed as the great-circle distance from `query` to the point
/// that shares `query`'s coordinate on the non-split axis and `pivot`'s
/// coordinate on the split axis. It underestimates the true perpendicular
/// distance to the hyperplane, but it is monotone in the axis gap and never
/// exceeds the true minimum distance to the plane, which is what makes it
/// safe to use for branch pruning.
///
/// # Examples
///
/// ```
/// use geo_distances::{axis_lower_bound_km, Axis};
///
/// let d = axis_lower_bound_km((0.0, 0.0), (1.0, 0.0), Axis::Latitude);
/// assert!(d > 0.0);
/// ```
#[must_use]
pub fn axis_lower_bound_km(query: (f64, f64), pivot: (f64, f64), axis: Axis) -> f64 {
    let (q_lat, q_lon) = query;
    let (p_lat, p_lon) = pivot;

    let (plane_lat, plane_lon) = match axis {
        Axis::Latitude => (p_lat, q_lon),
        Axis::Longitude => (q_lat, p_lon),
    };

    great_circle_km(q_lat, q_lon, plane_lat, plane_lon)
}
