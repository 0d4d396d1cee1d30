//! Errors surfaced by the index and its record store.
//!
//! The core recovers nothing locally: every error kind here is meant to be
//! propagated to the caller, who is responsible for translating it into a
//! user-facing response. Nothing in this crate retries a failed operation.

use thiserror::Error;

/// An error from building, querying, or inserting into the index.
#[derive(Error, Debug)]
pub enum Error {
    /// A query was issued before `root_id` exists in the store.
    #[error("the index has not been built yet")]
    NotBuilt,

    /// A query or record had a malformed coordinate, age, or `k`.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The external key-value backend could not be reached.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A child identifier referenced by a record is missing from the store.
    #[error("data integrity violation: record {referencing_id:?} points to missing child {missing_id:?}")]
    DataIntegrity {
        /// The record that holds the dangling reference.
        referencing_id: String,
        /// The child identifier that could not be found in the store.
        missing_id: String,
    },
}

/// The specific reason a query or record failed input validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinate is not finite: ({latitude}, {longitude})")]
    NonFiniteCoordinate {
        /// The offending latitude.
        latitude: f64,
        /// The offending longitude.
        longitude: f64,
    },

    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Age was negative.
    #[error("age {0} is negative")]
    NegativeAge(i64),

    /// `k` was zero (or negative, where the caller's type allows it).
    #[error("k must be positive, got {0}")]
    NonPositiveK(i64),
}

/// A `Result` specialized to [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Validates a candidate `(latitude, longitude)` pair.
pub(crate) fn validate_coordinate(latitude: f64, longitude: f64) -> std::result::Result<(), InvalidInput> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(InvalidInput::NonFiniteCoordinate { latitude, longitude });
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(InvalidInput::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(InvalidInput::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

/// Validates a candidate age.
pub(crate) fn validate_age(age: i64) -> std::result::Result<(), InvalidInput> {
    if age < 0 {
        return Err(InvalidInput::NegativeAge(age));
    }
    Ok(())
}

/// Validates a candidate `k`.
pub(crate) fn validate_k(k: i64) -> std::result::Result<(), InvalidInput> {
    if k <= 0 {
        return Err(InvalidInput::NonPositiveK(k));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(matches!(
            validate_coordinate(91.0, 0.0),
            Err(InvalidInput::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinate() {
        assert!(matches!(
            validate_coordinate(f64::NAN, 0.0),
            Err(InvalidInput::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_negative_age() {
        assert!(matches!(validate_age(-1), Err(InvalidInput::NegativeAge(-1))));
    }

    #[test]
    fn rejects_non_positive_k() {
        assert!(matches!(validate_k(0), Err(InvalidInput::NonPositiveK(0))));
    }

    #[test]
    fn accepts_valid_input() {
        assert!(validate_coordinate(40.3, 13.3).is_ok());
        assert!(validate_age(0).is_ok());
        assert!(validate_k(1).is_ok());
    }
}
