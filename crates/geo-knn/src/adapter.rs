//! Translates an external, loosely-typed query into a validated search and
//! back into a flat result shape.
//!
//! This module owns no I/O of its own; it is the seam an HTTP handler or
//! CLI command would call through.

use crate::error::Result;
use crate::search::{KnnSearcher, Neighbor};
use crate::store::RecordStore;

/// The reference service's default neighbor count.
pub const DEFAULT_K: usize = 10;

/// The reference service's default age tolerance, in years.
pub const DEFAULT_AGE_TOLERANCE: i64 = 5;

/// An incoming query, as an external caller would supply it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Query latitude in decimal degrees.
    pub latitude: f64,
    /// Query longitude in decimal degrees.
    pub longitude: f64,
    /// Query age in whole years.
    pub age: i64,
}

/// One row of a query response.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Great-circle distance from the query point, in kilometers.
    pub distance_km: f64,
    /// The matched record's latitude.
    pub latitude: f64,
    /// The matched record's longitude.
    pub longitude: f64,
    /// The matched record's display name.
    pub name: String,
    /// The matched record's age.
    pub age: i64,
}

impl From<Neighbor> for QueryResult {
    fn from(neighbor: Neighbor) -> Self {
        Self {
            distance_km: neighbor.distance_km,
            latitude: neighbor.latitude,
            longitude: neighbor.longitude,
            name: neighbor.name,
            age: neighbor.age,
        }
    }
}

/// Runs `request` against `store` with the reference service's default `k`
/// and age tolerance.
pub fn query<S: RecordStore>(store: &S, request: &QueryRequest) -> Result<Vec<QueryResult>> {
    query_with(store, request, DEFAULT_K, DEFAULT_AGE_TOLERANCE)
}

/// Runs `request` against `store` with an explicit `k` and age tolerance.
pub fn query_with<S: RecordStore>(store: &S, request: &QueryRequest, k: usize, age_tolerance: i64) -> Result<Vec<QueryResult>> {
    let searcher = KnnSearcher::new(store);
    let neighbors = searcher.search(request.latitude, request.longitude, k, request.age, age_tolerance)?;
    Ok(neighbors.into_iter().map(QueryResult::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use crate::config::BuildConfig;
    use crate::record::Record;
    use crate::store::InProcessStore;

    fn built_store() -> InProcessStore {
        let store = InProcessStore::new();
        let records = vec![
            Record::new("0", 40.3, 13.3, 18, "hamza harkous"),
            Record::new("1", -8.0, 115.1, 30, "lior levy"),
            Record::new("2", 51.5, -0.1, 45, "aditi sharma"),
        ];
        IndexBuilder::new(&store, BuildConfig::default()).build(records).unwrap();
        store
    }

    #[test]
    fn query_uses_reference_defaults() {
        let store = built_store();
        let request = QueryRequest { latitude: 40.3, longitude: 13.3, age: 18 };
        let results = query(&store, &request).unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= DEFAULT_K);
    }

    #[test]
    fn query_with_explicit_parameters_is_honored() {
        let store = built_store();
        let request = QueryRequest { latitude: 40.3, longitude: 13.3, age: 18 };
        let results = query_with(&store, &request, 1, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "hamza harkous");
    }
}
