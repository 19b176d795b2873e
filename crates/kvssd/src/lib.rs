//! In-memory emulation of a key-value SSD.
//!
//! A KV-SSD stores opaque values under opaque keys and reports failures
//! through a fixed table of result codes. This crate reproduces that
//! contract without hardware:
//!
//! - **Validation**: keys of 4 to 255 bytes, values up to 2 MiB, value
//!   offsets aligned to 512 bytes, checked in a fixed order before any
//!   device state is touched
//! - **Ownership**: requests borrow caller buffers; the device keeps its own
//!   copies and hands out fresh copies on read
//! - **Backends**: [`HashmapKvssd`] (one reader-writer lock around the whole
//!   map) and [`ShardedKvssd`] (per-shard locking)
//!
//! # Example
//!
//! ```rust
//! use kvssd::{HashmapKvssd, KvsError, KvsKey, KvsValue, KvssdDevice};
//!
//! let device = HashmapKvssd::new();
//! let key = KvsKey::new(b"user0001");
//!
//! device.insert(key, KvsValue::new(b"payload"))?;
//! assert_eq!(device.read(key)?.as_bytes(), b"payload");
//!
//! assert_eq!(device.insert(key, KvsValue::new(b"again")), Err(KvsError::KeyAlreadyExists));
//! device.delete(key)?;
//! assert_eq!(device.read(key), Err(KvsError::KeyNotExist));
//! # Ok::<(), KvsError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod device;
pub mod error;
pub mod hash;
pub mod hashmap;
pub mod sharded;
pub mod types;
pub mod validation;

pub use config::{Backend, ConfigError, KvssdConfig, open_device};
pub use device::KvssdDevice;
pub use error::{KVS_SUCCESS_MESSAGE, KvsError, Result, kvs_strerror};
pub use hash::{FnvBuildHasher, FnvHasher};
pub use hashmap::HashmapKvssd;
pub use sharded::ShardedKvssd;
pub use types::{
    ALIGNMENT_UNIT, KvsKey, KvsValue, MAX_KEY_LENGTH, MAX_VALUE_LENGTH, MIN_KEY_LENGTH,
    MIN_VALUE_LENGTH, OwnedValue, VALUE_LENGTH_ALIGNMENT_UNIT,
};
pub use validation::validate_request;
