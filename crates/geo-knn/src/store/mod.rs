//! The pluggable storage abstraction: everything above this trait is
//! agnostic to whether records live in process memory or in an external
//! key-value service.

mod construction;
mod memory;
#[cfg(feature = "external-store")]
mod external;

pub use construction::ConstructionStore;
pub use memory::InProcessStore;
#[cfg(feature = "external-store")]
pub use external::ExternalStore;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::record::{Record, Side};

/// Storage for records and a handful of top-level scalars (chiefly the
/// tree's `root_id`), with no knowledge of k-d tree semantics.
///
/// Implementations must be safe to share behind a shared reference: queries
/// run concurrently, and nothing here takes `&mut self`.
pub trait RecordStore {
    /// Stores a record, creating or overwriting it in full.
    fn put_record(&self, record: &Record) -> Result<()>;

    /// Fetches a record by id, or `None` if it does not exist.
    fn get_record(&self, id: &str) -> Result<Option<Record>>;

    /// Fetches a top-level scalar value by key.
    fn get_scalar(&self, key: &str) -> Result<Option<String>>;

    /// Sets a top-level scalar value.
    fn set_scalar(&self, key: &str, value: &str) -> Result<()>;

    /// Updates a single child-pointer field on an existing record, without
    /// requiring the caller to read-modify-write the whole record.
    ///
    /// Returns [`Error::DataIntegrity`] if `id` does not name an existing
    /// record.
    fn update_field(&self, id: &str, side: Side, value: Option<String>) -> Result<()>;

    /// Forces any buffered writes to become durable.
    ///
    /// The base backends have nothing to buffer; this only does real work
    /// when wrapped in a [`ConstructionStore`].
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Signals the start of a bulk construction phase.
    ///
    /// The base backends ignore this; [`ConstructionStore`] uses it to start
    /// staging writes in memory instead of issuing them immediately.
    fn begin_construction(&self) -> Result<()> {
        Ok(())
    }

    /// Signals the end of a bulk construction phase, flushing any staged
    /// writes.
    fn end_construction(&self) -> Result<()> {
        self.flush()
    }
}

/// Helper shared by backends: turns a missing required record into
/// [`Error::DataIntegrity`] given the id of the record that referenced it.
pub(crate) fn missing_child(referencing_id: &str, missing_id: &str) -> Error {
    Error::DataIntegrity {
        referencing_id: referencing_id.to_string(),
        missing_id: missing_id.to_string(),
    }
}

/// Constructs the backend described by `config`.
///
/// This is the one place that maps [`StoreConfig`] onto a concrete
/// [`RecordStore`]; callers that already know which backend they want are
/// free to construct [`InProcessStore`] or [`ExternalStore`] directly
/// instead.
pub fn open(config: &StoreConfig) -> Result<Box<dyn RecordStore + Send + Sync>> {
    match config {
        StoreConfig::InProcess => Ok(Box::new(InProcessStore::new())),
        #[cfg(feature = "external-store")]
        StoreConfig::External { connection_url } => Ok(Box::new(ExternalStore::connect(connection_url)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_process_yields_a_working_store() {
        let store = open(&StoreConfig::InProcess).unwrap();
        store.put_record(&Record::new("0", 1.0, 1.0, 20, "a")).unwrap();
        assert!(store.get_record("0").unwrap().is_some());
    }
}
