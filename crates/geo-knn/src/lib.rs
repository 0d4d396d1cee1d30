//! A geospatial k-nearest-neighbor recommender.
//!
//! The core is a k-d tree over `(latitude, longitude)` pairs, split in
//! round-robin fashion by [`geo_distances::Axis`], with an age-filtered
//! bounded kNN search ([`search::KnnSearcher`]) and non-balancing single
//! record insertion ([`insert::insert`]). Records live behind a pluggable
//! [`store::RecordStore`]: either in process memory or, with the
//! `external-store` feature, a Redis-backed service, wrapped during bulk
//! construction in a batching [`store::ConstructionStore`].
//!
//! ## Features
//!
//! - `external-store`: enables [`store::ExternalStore`], a Redis-backed
//!   `RecordStore` for datasets too large to hold in process memory.

mod adapter;
mod builder;
mod config;
mod error;
mod heap;
mod insert;
mod profiler;
mod record;
mod search;
mod splitter;
mod store;

pub use adapter::{query, query_with, QueryRequest, QueryResult, DEFAULT_AGE_TOLERANCE, DEFAULT_K};
pub use builder::{IndexBuilder, ROOT_ID_KEY};
pub use config::{BuildConfig, MedianMode, StoreConfig};
pub use error::{Error, InvalidInput, Result};
pub use heap::BoundedTopK;
pub use insert::{find_item, insert};
pub use profiler::{LatitudeRange, ProfileReport, Profiler};
pub use record::{Record, Side};
pub use search::{KnnSearcher, Neighbor};
pub use splitter::{MedianSplitter, SplitOutcome};
pub use store::{open, ConstructionStore, InProcessStore, RecordStore};
#[cfg(feature = "external-store")]
pub use store::ExternalStore;
