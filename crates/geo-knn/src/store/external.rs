//! The Redis-backed `RecordStore` backend, for datasets too large to hold
//! in process memory.
//!
//! Only compiled with the `external-store` feature.

use r2d2::Pool;
use redis::Commands;

use super::{missing_child, RecordStore};
use crate::error::{Error, Result};
use crate::record::{Record, Side};

const ABSENT: &str = "None";

fn store_unavailable(err: impl std::fmt::Display) -> Error {
    Error::StoreUnavailable(err.to_string())
}

/// Stores records as Redis hashes keyed by the bare record id, and scalars
/// (chiefly `root_id`) as plain string keys under their bare name.
///
/// A missing child pointer is encoded as the literal field value `"None"`
/// rather than an absent field, matching the reference service's own
/// hash layout.
pub struct ExternalStore {
    pool: Pool<redis::Client>,
}

impl ExternalStore {
    /// Connects to a Redis-compatible server at `connection_url` and
    /// verifies reachability immediately with a `PING`.
    ///
    /// Returns [`Error::StoreUnavailable`] if the client cannot be built or
    /// the initial ping fails, rather than deferring the failure to the
    /// first real operation.
    pub fn connect(connection_url: &str) -> Result<Self> {
        let client = redis::Client::open(connection_url).map_err(store_unavailable)?;
        let pool = Pool::builder().build(client).map_err(store_unavailable)?;
        let mut conn = pool.get().map_err(store_unavailable)?;
        redis::cmd("PING").query::<String>(&mut *conn).map_err(store_unavailable)?;
        Ok(Self { pool })
    }

    fn record_key(id: &str) -> String {
        id.to_string()
    }

    fn scalar_key(key: &str) -> String {
        key.to_string()
    }
}

fn decode_child(raw: Option<&String>) -> Option<String> {
    match raw {
        None => None,
        Some(v) if v == ABSENT => None,
        Some(v) => Some(v.clone()),
    }
}

impl RecordStore for ExternalStore {
    fn put_record(&self, record: &Record) -> Result<()> {
        let mut conn = self.pool.get().map_err(store_unavailable)?;
        let fields = [
            ("latitude", record.latitude.to_string()),
            ("longitude", record.longitude.to_string()),
            ("age", record.age.to_string()),
            ("name", record.name.clone()),
            ("left_id", record.left_id.clone().unwrap_or_else(|| ABSENT.to_string())),
            ("right_id", record.right_id.clone().unwrap_or_else(|| ABSENT.to_string())),
        ];
        conn.hset_multiple::<_, _, _, ()>(Self::record_key(&record.id), &fields)
            .map_err(store_unavailable)?;
        Ok(())
    }

    fn get_record(&self, id: &str) -> Result<Option<Record>> {
        let mut conn = self.pool.get().map_err(store_unavailable)?;
        let map: std::collections::HashMap<String, String> =
            conn.hgetall(Self::record_key(id)).map_err(store_unavailable)?;
        if map.is_empty() {
            return Ok(None);
        }
        let parse_f64 = |field: &str| -> Result<f64> {
            map.get(field)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| missing_child(id, field))
        };
        let parse_i64 = |field: &str| -> Result<i64> {
            map.get(field)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| missing_child(id, field))
        };
        Ok(Some(Record {
            id: id.to_string(),
            latitude: parse_f64("latitude")?,
            longitude: parse_f64("longitude")?,
            age: parse_i64("age")?,
            name: map.get("name").cloned().unwrap_or_default(),
            left_id: decode_child(map.get("left_id")),
            right_id: decode_child(map.get("right_id")),
        }))
    }

    fn get_scalar(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get().map_err(store_unavailable)?;
        conn.get(Self::scalar_key(key)).map_err(store_unavailable)
    }

    fn set_scalar(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.pool.get().map_err(store_unavailable)?;
        conn.set::<_, _, ()>(Self::scalar_key(key), value).map_err(store_unavailable)?;
        Ok(())
    }

    fn update_field(&self, id: &str, side: Side, value: Option<String>) -> Result<()> {
        let mut conn = self.pool.get().map_err(store_unavailable)?;
        let exists: bool = conn.exists(Self::record_key(id)).map_err(store_unavailable)?;
        if !exists {
            return Err(missing_child(id, id));
        }
        let field = match side {
            Side::Left => "left_id",
            Side::Right => "right_id",
        };
        conn.hset::<_, _, _, ()>(Self::record_key(id), field, value.unwrap_or_else(|| ABSENT.to_string()))
            .map_err(store_unavailable)?;
        Ok(())
    }
}
