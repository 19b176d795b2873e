//! Row-oriented YCSB binding for the KV-SSD emulation.
//!
//! YCSB records are named field lists. This crate stores each record as a
//! single device value, encoded by [`codec`], and exposes the record
//! operations the benchmark harness expects through the [`Db`] trait.
//!
//! # Example
//!
//! ```rust
//! use kvssd::HashmapKvssd;
//! use kvssd_ycsb::{Field, RowStore};
//!
//! let store = RowStore::new(HashmapKvssd::new());
//! let row = vec![Field::new("field0", "hello"), Field::new("field1", "world")];
//!
//! store.insert_row("user0001", &row)?;
//! assert_eq!(store.read_row("user0001")?, row);
//!
//! store.delete_row("user0001")?;
//! let err = store.read_row("user0001").unwrap_err();
//! assert_eq!(err.to_string(), "Key does not exist");
//! # Ok::<(), kvssd_ycsb::RowError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
pub mod db;
pub mod error;
pub mod field;
pub mod row;
pub mod smoke;

pub use codec::{FieldRecord, decode_row, encode_row};
pub use db::{DB_NAME, Db, DbFactory, DbResult, Status};
pub use error::{CodecError, Result, RowError};
pub use field::Field;
pub use row::{DynRowStore, RowStore};
pub use smoke::{Deviation, SmokeReport};
