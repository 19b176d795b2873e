//! Row operations over a device
//!
//! Each row is one device entry: the row key becomes the device key and the
//! encoded field list becomes the value. Device failures come back unchanged,
//! so their message is exactly the device's fixed text.

use kvssd::{KvsKey, KvsValue, KvssdConfig, KvssdDevice, OwnedValue, open_device};
use tracing::trace;

use crate::codec::{decode_row, encode_row};
use crate::error::Result;
use crate::field::Field;

/// Row store backed by a KV-SSD device.
pub struct RowStore<D> {
    device: D,
}

/// Row store over a device chosen at runtime.
pub type DynRowStore = RowStore<Box<dyn KvssdDevice>>;

impl<D: KvssdDevice> RowStore<D> {
    /// Wrap a device.
    pub const fn new(device: D) -> Self {
        Self { device }
    }

    /// The underlying device.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Read and decode the row stored under `key`.
    pub fn read_row(&self, key: &str) -> Result<Vec<Field>> {
        let value: OwnedValue = self.device.read(row_key(key))?;
        let fields = decode_row(value.as_bytes())?;
        trace!(key, fields = fields.len(), "read row");
        Ok(fields)
    }

    /// Store a new row. Fails if `key` already holds one.
    pub fn insert_row(&self, key: &str, fields: &[Field]) -> Result<()> {
        let blob = encode_row(fields)?;
        self.device.insert(row_key(key), KvsValue::new(&blob))?;
        trace!(key, bytes = blob.len(), "insert row");
        Ok(())
    }

    /// Replace the row stored under `key`. Fails if there is none.
    pub fn update_row(&self, key: &str, fields: &[Field]) -> Result<()> {
        let blob = encode_row(fields)?;
        self.device.update(row_key(key), KvsValue::new(&blob))?;
        trace!(key, bytes = blob.len(), "update row");
        Ok(())
    }

    /// Remove the row stored under `key`.
    pub fn delete_row(&self, key: &str) -> Result<()> {
        self.device.delete(row_key(key))?;
        trace!(key, "delete row");
        Ok(())
    }
}

impl DynRowStore {
    /// Open the device selected by `config`.
    pub fn open(config: &KvssdConfig) -> std::result::Result<Self, kvssd::ConfigError> {
        Ok(Self::new(open_device(config)?))
    }
}

fn row_key(key: &str) -> KvsKey<'_> {
    KvsKey::new(key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvssd::{HashmapKvssd, KvsError};

    fn fields(pairs: &[(&str, &str)]) -> Vec<Field> {
        pairs.iter().map(|(n, v)| Field::new(*n, *v)).collect()
    }

    #[test]
    fn test_row_lifecycle() {
        let store = RowStore::new(HashmapKvssd::new());
        let v1 = fields(&[("field1", "value1_1"), ("field2", "value1_2")]);
        let v2 = fields(&[("field1", "value2_1"), ("field2", "value2_2")]);

        store.insert_row("key1", &v1).unwrap();
        assert_eq!(store.read_row("key1").unwrap(), v1);

        store.update_row("key1", &v2).unwrap();
        assert_eq!(store.read_row("key1").unwrap(), v2);

        store.delete_row("key1").unwrap();
        let err = store.read_row("key1").unwrap_err();
        assert_eq!(err.to_string(), "Key does not exist");
    }

    #[test]
    fn test_stored_value_shape() {
        let store = RowStore::new(HashmapKvssd::new());
        let row = fields(&[("field0", "abc")]);
        store.insert_row("user0001", &row).unwrap();

        let value = store.device().read(KvsKey::new(b"user0001")).unwrap();
        let encoded = encode_row(&row).unwrap();
        assert_eq!(value.as_bytes(), encoded.as_slice());
        assert_eq!(value.length() as usize, encoded.len());
        assert_eq!(value.actual_value_size() as usize, encoded.len());
        assert_eq!(value.offset(), 0);
    }

    #[test]
    fn test_short_key_is_rejected() {
        let store = RowStore::new(HashmapKvssd::new());
        let err = store.insert_row("abc", &[]).unwrap_err();
        assert_eq!(err.device_error(), Some(KvsError::KeyLengthInvalid));
        assert!(store.device().is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_codec_error() {
        let store = RowStore::new(HashmapKvssd::new());
        store
            .device()
            .insert(KvsKey::new(b"rawkey"), KvsValue::new(&[9, 0, 0, 0, b'x']))
            .unwrap();

        let err = store.read_row("rawkey").unwrap_err();
        assert_eq!(err.device_error(), None);
    }

    #[test]
    fn test_open_from_config() {
        let store = DynRowStore::open(&KvssdConfig::new()).unwrap();
        store.insert_row("key0001", &fields(&[("a", "b")])).unwrap();
        assert_eq!(store.device().len(), 1);
    }
}
