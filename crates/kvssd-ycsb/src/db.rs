//! Benchmark harness binding
//!
//! The harness drives every database through the [`Db`] trait and only
//! distinguishes a few outcomes, so row errors collapse into a [`Status`]
//! here. The device message is logged before it is dropped.

use std::collections::HashMap;

use kvssd::{ConfigError, KvsError, KvssdConfig, KvssdDevice};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::RowError;
use crate::field::{Field, project};
use crate::row::{DynRowStore, RowStore};

/// Name this binding registers under in the harness.
pub const DB_NAME: &str = "kvssd";

/// Failure outcome reported to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Status {
    /// The operation failed
    #[error("Operation failed")]
    Error,
    /// The key does not exist
    #[error("Key not found")]
    NotFound,
    /// The operation is not supported by this binding
    #[error("Operation not implemented")]
    NotImplemented,
}

impl From<&RowError> for Status {
    fn from(err: &RowError) -> Self {
        match err {
            RowError::Device(KvsError::KeyNotExist) => Self::NotFound,
            _ => Self::Error,
        }
    }
}

/// Result of a harness operation. `Ok` is the harness's success status.
pub type DbResult<T> = std::result::Result<T, Status>;

/// Database interface the benchmark harness drives.
///
/// `table` names the harness table. Bindings with a single namespace
/// ignore it.
pub trait Db: Send + Sync {
    /// Read a record. With `fields`, only the named fields are returned.
    fn read(&self, table: &str, key: &str, fields: Option<&[String]>) -> DbResult<Vec<Field>>;

    /// Read up to `count` records in key order starting at `start_key`.
    fn scan(
        &self,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&[String]>,
    ) -> DbResult<Vec<Vec<Field>>>;

    /// Replace an existing record.
    fn update(&self, table: &str, key: &str, values: &[Field]) -> DbResult<()>;

    /// Insert a new record.
    fn insert(&self, table: &str, key: &str, values: &[Field]) -> DbResult<()>;

    /// Delete a record.
    fn delete(&self, table: &str, key: &str) -> DbResult<()>;
}

fn failed(op: &'static str, key: &str, err: &RowError) -> Status {
    let status = Status::from(err);
    warn!(op, key, status = ?status, "{err}");
    status
}

impl<D: KvssdDevice> Db for RowStore<D> {
    fn read(&self, _table: &str, key: &str, fields: Option<&[String]>) -> DbResult<Vec<Field>> {
        let row = self.read_row(key).map_err(|e| failed("read", key, &e))?;
        Ok(match fields {
            Some(names) => project(row, names),
            None => row,
        })
    }

    fn scan(
        &self,
        _table: &str,
        _start_key: &str,
        _count: usize,
        _fields: Option<&[String]>,
    ) -> DbResult<Vec<Vec<Field>>> {
        Err(Status::NotImplemented)
    }

    fn update(&self, _table: &str, key: &str, values: &[Field]) -> DbResult<()> {
        self.update_row(key, values)
            .map_err(|e| failed("update", key, &e))
    }

    fn insert(&self, _table: &str, key: &str, values: &[Field]) -> DbResult<()> {
        self.insert_row(key, values)
            .map_err(|e| failed("insert", key, &e))
    }

    fn delete(&self, _table: &str, key: &str) -> DbResult<()> {
        self.delete_row(key).map_err(|e| failed("delete", key, &e))
    }
}

/// Builds [`Db`] instances from harness properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbFactory;

impl DbFactory {
    /// Create a database over the device named by the `kvssd.backend`
    /// property.
    pub fn new_db(props: &HashMap<String, String>) -> Result<Box<dyn Db>, ConfigError> {
        let config = KvssdConfig::from_properties(props)?;
        let store = DynRowStore::open(&config)?;
        debug!(backend = %config.backend, "Created {DB_NAME} database");
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvssd::{HashmapKvssd, ShardedKvssd};

    fn row() -> Vec<Field> {
        vec![
            Field::new("field0", "a"),
            Field::new("field1", "b"),
            Field::new("field2", "c"),
        ]
    }

    #[test]
    fn test_status_mapping() {
        let db = RowStore::new(HashmapKvssd::new());

        assert_eq!(db.read("usertable", "user0001", None), Err(Status::NotFound));
        assert_eq!(db.update("usertable", "user0001", &row()), Err(Status::NotFound));
        assert_eq!(db.delete("usertable", "user0001"), Err(Status::NotFound));

        db.insert("usertable", "user0001", &row()).unwrap();
        assert_eq!(db.insert("usertable", "user0001", &row()), Err(Status::Error));
        assert_eq!(db.insert("usertable", "abc", &row()), Err(Status::Error));
    }

    #[test]
    fn test_read_with_field_filter() {
        let db = RowStore::new(ShardedKvssd::new());
        db.insert("usertable", "user0001", &row()).unwrap();

        let names = vec!["field2".to_string(), "field1".to_string()];
        assert_eq!(
            db.read("usertable", "user0001", Some(names.as_slice())).unwrap(),
            vec![Field::new("field1", "b"), Field::new("field2", "c")]
        );
        assert_eq!(db.read("usertable", "user0001", None).unwrap(), row());
    }

    #[test]
    fn test_table_is_ignored() {
        let db = RowStore::new(HashmapKvssd::new());
        db.insert("table_a", "user0001", &row()).unwrap();
        assert_eq!(db.read("table_b", "user0001", None).unwrap(), row());
    }

    #[test]
    fn test_scan_not_implemented() {
        let db = RowStore::new(HashmapKvssd::new());
        assert_eq!(
            db.scan("usertable", "user0001", 10, None),
            Err(Status::NotImplemented)
        );
    }

    #[test]
    fn test_factory() {
        let props = HashMap::from([("kvssd.backend".to_string(), "sharded".to_string())]);
        let db = DbFactory::new_db(&props).unwrap();
        db.insert("usertable", "user0001", &row()).unwrap();
        assert_eq!(db.read("usertable", "user0001", None).unwrap(), row());

        let props = HashMap::from([("kvssd.backend".to_string(), "kvssd".to_string())]);
        assert!(matches!(
            DbFactory::new_db(&props),
            Err(ConfigError::UnsupportedBackend(_))
        ));
    }
}
