//! Sharded device emulation
//!
//! Keys are spread across independently locked shards, so operations on
//! different keys do not contend. Each key still sees linearizable
//! operations because its existence check and its write happen under the
//! same shard lock. No ordering is promised between different keys.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, trace};

use crate::device::KvssdDevice;
use crate::error::{KvsError, Result};
use crate::hash::FnvBuildHasher;
use crate::types::{KvsKey, KvsValue, OwnedValue};
use crate::validation::{checked_key, checked_write};

/// Default number of shards.
pub const DEFAULT_SHARD_AMOUNT: usize = 64;

/// Largest shard amount a device is created with.
pub const MAX_SHARD_AMOUNT: usize = 1 << 16;

/// In-memory device backed by a sharded concurrent map.
pub struct ShardedKvssd {
    table: DashMap<Box<[u8]>, OwnedValue, FnvBuildHasher>,
}

impl Default for ShardedKvssd {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardedKvssd {
    /// Create an empty device with [`DEFAULT_SHARD_AMOUNT`] shards.
    pub fn new() -> Self {
        Self::with_shard_amount(DEFAULT_SHARD_AMOUNT)
    }

    /// Create an empty device with the given number of shards.
    ///
    /// The amount is clamped to `2..=MAX_SHARD_AMOUNT` and rounded up to a
    /// power of two.
    pub fn with_shard_amount(shard_amount: usize) -> Self {
        let shard_amount = shard_amount.clamp(2, MAX_SHARD_AMOUNT).next_power_of_two();
        debug!("Opening sharded KV-SSD emulation with {shard_amount} shards");
        Self {
            table: DashMap::with_hasher_and_shard_amount(FnvBuildHasher::default(), shard_amount),
        }
    }
}

impl KvssdDevice for ShardedKvssd {
    fn read(&self, key: KvsKey<'_>) -> Result<OwnedValue> {
        let key = checked_key(&key)?;
        let value = self.table.get(key).map(|entry| entry.value().clone());
        trace!(key_len = key.len(), hit = value.is_some(), "read");
        value.ok_or(KvsError::KeyNotExist)
    }

    fn insert(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        let (key, value) = checked_write(&key, &value)?;

        // Checked under a shared guard first so a conflicting insert does not
        // allocate a key copy
        if self.table.contains_key(key) {
            return Err(KvsError::KeyAlreadyExists);
        }
        match self.table.entry(Box::from(key)) {
            Entry::Occupied(_) => Err(KvsError::KeyAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(value);
                trace!(key_len = key.len(), "insert");
                Ok(())
            }
        }
    }

    fn update(&self, key: KvsKey<'_>, value: KvsValue<'_>) -> Result<()> {
        let (key, value) = checked_write(&key, &value)?;

        let mut slot = self.table.get_mut(key).ok_or(KvsError::KeyNotExist)?;
        *slot = value;
        drop(slot);

        trace!(key_len = key.len(), "update");
        Ok(())
    }

    fn delete(&self, key: KvsKey<'_>) -> Result<()> {
        let key = checked_key(&key)?;
        let removed = self.table.remove(key);
        trace!(key_len = key.len(), hit = removed.is_some(), "delete");
        if removed.is_none() {
            return Err(KvsError::KeyNotExist);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}

impl Drop for ShardedKvssd {
    fn drop(&mut self) {
        debug!(
            "Closing sharded KV-SSD emulation, releasing {} entries",
            self.table.len()
        );
    }
}
