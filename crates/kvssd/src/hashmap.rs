//! Hashmap-backed device emulation
//!
//! One reader-writer lock guards the whole map. Every operation is
//! serialized at that lock, which makes all operations totally ordered:
//! reads run concurrently with each other and block only behind a writer,
//! writers block behind any holder.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::device::KvssdDevice;
use crate::error::{KvsError, Result};
use crate::hash::FnvBuildHasher;
use crate::types::{KvsKey, KvsValue, OwnedValue};
use crate::validation::{checked_key, checked_write};

type Table = HashMap<Box<[u8]>, OwnedValue, FnvBuildHasher>;

/// In-memory device backed by a single locked hashmap.
///
/// The map owns a private copy of every key and value. Keys are copied once
/// on insert; updates replace only the value.
pub struct HashmapKvssd {
    table: RwLock<Table>,
}

impl Default for HashmapKvssd {
    fn default() -> Self {
        Self::new()
    }
}

impl HashmapKvssd {
    /// Create an empty device.
    pub fn new() -> Self {
        debug!("Opening hashmap KV-SSD emulation");
        Self {
            table: RwLock::new(Table::default()),
        }
    }

    /// Create an empty device with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        debug!("Opening hashmap KV-SSD emulation with capacity {capacity}");
        Self {
            table: RwLock::new(Table::with_capacity_and_hasher(
                capacity,
                FnvBuildHasher::default(),
            )),
        }
    }
}

impl KvssdDevice for HashmapKvssd {
    fn read(&self, key: KvsKey<'_>) -> Result<OwnedValue> {
        let key = checked_key(&key)?;

        let table = self.table.read();
        let value = table.get(key).cloned();
        drop(table);

        trace!(key_len = key.len(), hit = value.is_some(), "read");
        value.ok_or(KvsError::KeyNotExist)
    }

    fn insert(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        let (key, value) = checked_write(&key, &value)?;

        let mut table = self.table.write();
        if table.contains_key(key) {
            return Err(KvsError::KeyAlreadyExists);
        }
        table.insert(Box::from(key), value);
        drop(table);

        trace!(key_len = key.len(), "insert");
        Ok(())
    }

    fn update(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        let (key, value) = checked_write(&key, &value)?;

        let mut table = self.table.write();
        let slot = table.get_mut(key).ok_or(KvsError::KeyNotExist)?;
        // The previous value is dropped here, inside the exclusive section
        *slot = value;
        drop(table);

        trace!(key_len = key.len(), "update");
        Ok(())
    }

    fn delete(&self, key: KvsKey<'_>) -> Result<()> {
        let key = checked_key(&key)?;

        let removed = self.table.write().remove(key);
        trace!(key_len = key.len(), hit = removed.is_some(), "delete");
        if removed.is_none() {
            return Err(KvsError::KeyNotExist);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.table.read().len()
    }
}

impl Drop for HashmapKvssd {
    fn drop(&mut self) {
        let entries = self.table.get_mut().len();
        debug!("Closing hashmap KV-SSD emulation, releasing {entries} entries");
    }
}
