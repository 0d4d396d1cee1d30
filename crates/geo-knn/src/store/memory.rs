//! The in-process `RecordStore` backend: a `RwLock`-guarded map, no external
//! dependency.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{missing_child, RecordStore};
use crate::error::Result;
use crate::record::{Record, Side};

/// Holds the whole dataset in process memory.
///
/// Reads take a shared lock and may run concurrently with each other;
/// writes (record construction, child-pointer updates) take an exclusive
/// lock. Once construction finishes, this is effectively read-only and
/// contention is never an issue.
#[derive(Debug, Default)]
pub struct InProcessStore {
    records: RwLock<HashMap<String, Record>>,
    scalars: RwLock<HashMap<String, String>>,
}

impl InProcessStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InProcessStore {
    fn put_record(&self, record: &Record) -> Result<()> {
        self.records
            .write()
            .expect("record store lock poisoned")
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get_record(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.records.read().expect("record store lock poisoned").get(id).cloned())
    }

    fn get_scalar(&self, key: &str) -> Result<Option<String>> {
        Ok(self.scalars.read().expect("record store lock poisoned").get(key).cloned())
    }

    fn set_scalar(&self, key: &str, value: &str) -> Result<()> {
        self.scalars
            .write()
            .expect("record store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update_field(&self, id: &str, side: Side, value: Option<String>) -> Result<()> {
        let mut records = self.records.write().expect("record store lock poisoned");
        match records.get_mut(id) {
            Some(record) => {
                record.set_child(side, value);
                Ok(())
            }
            None => Err(missing_child(id, id)),
        }
    }
}
