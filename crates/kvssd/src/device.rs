//! Device trait shared by every backend

use crate::error::Result;
use crate::types::{KvsKey, KvsValue, OwnedValue};

/// The four primitive operations of a key-value device.
///
/// Every operation validates its request first and returns without touching
/// device state when validation fails. Written values are copied into device
/// memory; values returned from [`read`](Self::read) are independent copies.
pub trait KvssdDevice: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Fails with `KeyNotExist` if the key is absent.
    fn read(&self, key: KvsKey<'_>) -> Result<OwnedValue>;

    /// Store a new key. Fails with `KeyAlreadyExists` without changing the
    /// stored value if the key is present.
    fn insert(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()>;

    /// Replace the value of an existing key. Fails with `KeyNotExist` if the
    /// key is absent.
    fn update(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()>;

    /// Remove a key and its value. Fails with `KeyNotExist` if the key is absent.
    fn delete(&self, key: KvsKey<'_>) -> Result<()>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    /// Whether the device holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D: KvssdDevice + ?Sized> KvssdDevice for Box<D> {
    fn read(&self, key: KvsKey<'_>) -> Result<OwnedValue> {
        (**self).read(key)
    }

    fn insert(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        (**self).insert(key, value)
    }

    fn update(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        (**self).update(key, value)
    }

    fn delete(&self, key: KvsKey<'_>) -> Result<()> {
        (**self).delete(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
