//! Key and value buffers exchanged with the device
//!
//! Requests borrow caller memory through [`KvsKey`] and [`KvsValue`]
//! descriptors. Anything a device keeps or hands back is an [`OwnedValue`]
//! or a boxed key, so caller buffers and device buffers never alias.

/// Minimum key length in bytes.
pub const MIN_KEY_LENGTH: usize = 4;
/// Maximum key length in bytes.
pub const MAX_KEY_LENGTH: usize = 255;
/// Minimum value length in bytes.
pub const MIN_VALUE_LENGTH: u32 = 0;
/// Maximum value length in bytes (2 MiB).
pub const MAX_VALUE_LENGTH: u32 = 2 * 1024 * 1024;
/// Value offsets must be a multiple of this unit.
pub const ALIGNMENT_UNIT: u32 = 512;
/// Value length alignment unit of the device API. Not enforced by the emulation.
pub const VALUE_LENGTH_ALIGNMENT_UNIT: u32 = 4;

/// Key descriptor for a device request.
///
/// `key` is `None` when the caller passed no buffer. The key content is the
/// first `length` bytes of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvsKey<'a> {
    /// Caller key buffer
    pub key: Option<&'a [u8]>,
    /// Claimed key length in bytes
    pub length: usize,
}

impl<'a> KvsKey<'a> {
    /// Describe a whole slice as a key.
    pub const fn new(key: &'a [u8]) -> Self {
        Self {
            key: Some(key),
            length: key.len(),
        }
    }

    /// Build a descriptor from its raw parts.
    pub const fn from_raw(key: Option<&'a [u8]>, length: usize) -> Self {
        Self { key, length }
    }

    /// Key content, or `None` if the buffer is missing or shorter than `length`.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        self.key.and_then(|k| k.get(..self.length))
    }
}

impl<'a> From<&'a [u8]> for KvsKey<'a> {
    fn from(key: &'a [u8]) -> Self {
        Self::new(key)
    }
}

impl<'a> From<&'a str> for KvsKey<'a> {
    fn from(key: &'a str) -> Self {
        Self::new(key.as_bytes())
    }
}

/// Value descriptor for a device request.
///
/// `offset` addresses a position inside a larger device-resident object. The
/// emulation validates its alignment and keeps it with the value but never
/// uses it to address a partial read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvsValue<'a> {
    /// Caller value buffer
    pub value: Option<&'a [u8]>,
    /// Number of bytes available in the buffer
    pub length: u32,
    /// Size of the value as stored on the device
    pub actual_value_size: u32,
    /// Offset into the device-resident value
    pub offset: u32,
}

impl<'a> KvsValue<'a> {
    /// Describe a whole slice as a value at offset 0.
    ///
    /// Slices longer than `u32::MAX` saturate the length, which validation
    /// then rejects as out of range.
    pub fn new(value: &'a [u8]) -> Self {
        let length = u32::try_from(value.len()).unwrap_or(u32::MAX);
        Self {
            value: Some(value),
            length,
            actual_value_size: length,
            offset: 0,
        }
    }

    /// Build a descriptor from its raw parts.
    pub const fn from_raw(
        value: Option<&'a [u8]>,
        length: u32,
        actual_value_size: u32,
        offset: u32,
    ) -> Self {
        Self {
            value,
            length,
            actual_value_size,
            offset,
        }
    }

    /// Set the value offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Value content, or `None` if the buffer is missing or shorter than `length`.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        let length = usize::try_from(self.length).ok()?;
        self.value.and_then(|v| v.get(..length))
    }
}

/// A value that owns its bytes.
///
/// Devices store values in this form and return fresh copies of it on read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnedValue {
    bytes: Vec<u8>,
    actual_value_size: u32,
    offset: u32,
}

impl OwnedValue {
    /// Copy the content of a request descriptor.
    ///
    /// Returns `None` when the descriptor has no usable content; devices
    /// validate descriptors before copying, so this only fails on unchecked input.
    pub fn copy_from(value: &KvsValue<'_>) -> Option<Self> {
        let bytes = if value.length == 0 {
            Vec::new()
        } else {
            value.as_bytes()?.to_vec()
        };
        Some(Self {
            bytes,
            actual_value_size: value.length,
            offset: value.offset,
        })
    }

    /// Value length in bytes.
    pub fn length(&self) -> u32 {
        // Stored values are validated against MAX_VALUE_LENGTH
        u32::try_from(self.bytes.len()).unwrap_or(u32::MAX)
    }

    /// Size of the value as stored.
    pub const fn actual_value_size(&self) -> u32 {
        self.actual_value_size
    }

    /// Offset the value was written with.
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Value content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the content out of the value.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Borrowed descriptor over this value, e.g. to write it to another device.
    pub fn as_value(&self) -> KvsValue<'_> {
        KvsValue::from_raw(
            Some(self.bytes.as_slice()),
            self.length(),
            self.actual_value_size,
            self.offset,
        )
    }
}
