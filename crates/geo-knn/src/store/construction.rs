//! A `RecordStore` decorator that buffers writes in memory during bulk
//! construction, flushing them to the wrapped store in batches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::RecordStore;
use crate::error::Result;
use crate::record::{Record, Side};

/// Wraps any [`RecordStore`] to stage `put_record`/`update_field`/`set_scalar`
/// calls in memory while `begin_construction`/`end_construction` brackets a
/// build, flushing every `batch_size` staged records and once more at the
/// end. Staged scalars (chiefly `root_id`) are flushed together with the
/// records, so a reader of the wrapped store never observes `root_id`
/// without the records it points to.
///
/// This exists so the external backend does not pay one round trip per
/// record while a multi-hundred-thousand-record tree is built.
pub struct ConstructionStore<S> {
    inner: S,
    buffer: Mutex<HashMap<String, Record>>,
    scalar_buffer: Mutex<HashMap<String, String>>,
    staging: AtomicBool,
    batch_size: usize,
}

impl<S: RecordStore> ConstructionStore<S> {
    /// Wraps `inner`, flushing staged records every `batch_size` puts.
    #[must_use]
    pub fn new(inner: S, batch_size: usize) -> Self {
        Self {
            inner,
            buffer: Mutex::new(HashMap::new()),
            scalar_buffer: Mutex::new(HashMap::new()),
            staging: AtomicBool::new(false),
            batch_size,
        }
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: RecordStore> RecordStore for ConstructionStore<S> {
    fn put_record(&self, record: &Record) -> Result<()> {
        if self.staging.load(Ordering::Acquire) {
            let should_flush = {
                let mut buffer = self.buffer.lock().expect("construction buffer lock poisoned");
                buffer.insert(record.id.clone(), record.clone());
                buffer.len() >= self.batch_size
            };
            if should_flush {
                self.flush()?;
            }
            Ok(())
        } else {
            self.inner.put_record(record)
        }
    }

    fn get_record(&self, id: &str) -> Result<Option<Record>> {
        if self.staging.load(Ordering::Acquire) {
            let buffered = self.buffer.lock().expect("construction buffer lock poisoned").get(id).cloned();
            if buffered.is_some() {
                return Ok(buffered);
            }
        }
        self.inner.get_record(id)
    }

    fn get_scalar(&self, key: &str) -> Result<Option<String>> {
        if self.staging.load(Ordering::Acquire) {
            let buffered = self.scalar_buffer.lock().expect("construction scalar buffer lock poisoned").get(key).cloned();
            if buffered.is_some() {
                return Ok(buffered);
            }
        }
        self.inner.get_scalar(key)
    }

    fn set_scalar(&self, key: &str, value: &str) -> Result<()> {
        if self.staging.load(Ordering::Acquire) {
            self.scalar_buffer
                .lock()
                .expect("construction scalar buffer lock poisoned")
                .insert(key.to_string(), value.to_string());
            Ok(())
        } else {
            self.inner.set_scalar(key, value)
        }
    }

    fn update_field(&self, id: &str, side: Side, value: Option<String>) -> Result<()> {
        if self.staging.load(Ordering::Acquire) {
            let mut buffer = self.buffer.lock().expect("construction buffer lock poisoned");
            if let Some(record) = buffer.get_mut(id) {
                record.set_child(side, value);
                return Ok(());
            }
        }
        self.inner.update_field(id, side, value)
    }

    fn flush(&self) -> Result<()> {
        let staged: Vec<Record> = {
            let mut buffer = self.buffer.lock().expect("construction buffer lock poisoned");
            buffer.drain().map(|(_, record)| record).collect()
        };
        for record in &staged {
            self.inner.put_record(record)?;
        }

        let staged_scalars: Vec<(String, String)> = {
            let mut buffer = self.scalar_buffer.lock().expect("construction scalar buffer lock poisoned");
            buffer.drain().collect()
        };
        for (key, value) in &staged_scalars {
            self.inner.set_scalar(key, value)?;
        }

        self.inner.flush()
    }

    fn begin_construction(&self) -> Result<()> {
        self.staging.store(true, Ordering::Release);
        self.inner.begin_construction()
    }

    fn end_construction(&self) -> Result<()> {
        self.flush()?;
        self.staging.store(false, Ordering::Release);
        self.inner.end_construction()
    }
}
