//! Device result codes
//!
//! The code table mirrors the KV-SSD host API. Every failure carries a fixed
//! message; callers compare against those strings, so they must never change.

use thiserror::Error;

/// Message reported for the success code (0x000).
pub const KVS_SUCCESS_MESSAGE: &str = "Successful";

/// Errors a key-value device can report.
///
/// Discriminants are the device result codes. Only the shape and existence
/// variants are reachable through the in-memory backends; the remaining codes
/// exist so that the table matches a real device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u16)]
pub enum KvsError {
    /// Buffer space is not enough
    #[error("Buffer space is not enough")]
    BufferSmall = 0x001,

    /// Device does not have enough space
    #[error("Device does not have enough space")]
    DevCapacity = 0x002,

    /// No device with the given handle exists
    #[error("No device with the dev_hd exists")]
    DevNotExist = 0x003,

    /// Key space does not have enough space
    #[error("Key space does not have enough space")]
    KsCapacity = 0x004,

    /// Key space is already created with the same name
    #[error("Key space is already created")]
    KsExist = 0x005,

    /// Key space index is not valid
    #[error("Index is not valid")]
    KsIndex = 0x006,

    /// Key space name is not valid
    #[error("Key space name is not valid")]
    KsName = 0x007,

    /// Key space does not exist
    #[error("Key space does not exist")]
    KsNotExist = 0x008,

    /// Key space is not open
    #[error("Key space does not open")]
    KsNotOpen = 0x009,

    /// Key space is already open
    #[error("Key space is already opened")]
    KsOpen = 0x00A,

    /// Iterator filter (bitmask and pattern) is not valid
    #[error("Iterator filter is not valid")]
    IteratorFilterInvalid = 0x00B,

    /// Device iterator limit reached
    #[error("Maximum number of iterators opened")]
    IteratorMax = 0x00C,

    /// Iterator key group does not exist
    #[error("Iterator Key Group does not exist")]
    IteratorNotExist = 0x00D,

    /// Iterator is already open
    #[error("Iterator is already opened")]
    IteratorOpen = 0x00E,

    /// Key length is outside the supported range
    #[error("Key is not valid")]
    KeyLengthInvalid = 0x00F,

    /// Key does not exist
    #[error("Key does not exist")]
    KeyNotExist = 0x010,

    /// Option is not supported by this implementation
    #[error("Option is not supported")]
    OptionInvalid = 0x011,

    /// Missing input buffer
    #[error("Null input parameter")]
    ParamInvalid = 0x012,

    /// I/O error
    #[error("I/O error occurs")]
    SysIo = 0x013,

    /// Value length is out of range
    #[error("Value length is out of range")]
    ValueLengthInvalid = 0x014,

    /// Value offset is out of range
    #[error("Value offset is out of range")]
    ValueOffsetInvalid = 0x015,

    /// Value offset is not a multiple of the alignment unit
    #[error("Value offset is misaligned")]
    ValueOffsetMisaligned = 0x016,

    /// Key exists but its value may not be updated
    #[error("Value update is not allowed")]
    ValueUpdateNotAllowed = 0x017,

    /// Device has not been opened
    #[error("Device was not opened yet")]
    DevNotOpened = 0x018,

    /// Insert on a key that is already stored
    #[error("Key already exists")]
    KeyAlreadyExists = 0x019,
}

impl KvsError {
    /// Every error code, in code order.
    pub const ALL: [Self; 25] = [
        Self::BufferSmall,
        Self::DevCapacity,
        Self::DevNotExist,
        Self::KsCapacity,
        Self::KsExist,
        Self::KsIndex,
        Self::KsName,
        Self::KsNotExist,
        Self::KsNotOpen,
        Self::KsOpen,
        Self::IteratorFilterInvalid,
        Self::IteratorMax,
        Self::IteratorNotExist,
        Self::IteratorOpen,
        Self::KeyLengthInvalid,
        Self::KeyNotExist,
        Self::OptionInvalid,
        Self::ParamInvalid,
        Self::SysIo,
        Self::ValueLengthInvalid,
        Self::ValueOffsetInvalid,
        Self::ValueOffsetMisaligned,
        Self::ValueUpdateNotAllowed,
        Self::DevNotOpened,
        Self::KeyAlreadyExists,
    ];

    /// Device result code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Fixed human-readable message for this code.
    pub const fn message(self) -> &'static str {
        match self {
            Self::BufferSmall => "Buffer space is not enough",
            Self::DevCapacity => "Device does not have enough space",
            Self::DevNotExist => "No device with the dev_hd exists",
            Self::KsCapacity => "Key space does not have enough space",
            Self::KsExist => "Key space is already created",
            Self::KsIndex => "Index is not valid",
            Self::KsName => "Key space name is not valid",
            Self::KsNotExist => "Key space does not exist",
            Self::KsNotOpen => "Key space does not open",
            Self::KsOpen => "Key space is already opened",
            Self::IteratorFilterInvalid => "Iterator filter is not valid",
            Self::IteratorMax => "Maximum number of iterators opened",
            Self::IteratorNotExist => "Iterator Key Group does not exist",
            Self::IteratorOpen => "Iterator is already opened",
            Self::KeyLengthInvalid => "Key is not valid",
            Self::KeyNotExist => "Key does not exist",
            Self::OptionInvalid => "Option is not supported",
            Self::ParamInvalid => "Null input parameter",
            Self::SysIo => "I/O error occurs",
            Self::ValueLengthInvalid => "Value length is out of range",
            Self::ValueOffsetInvalid => "Value offset is out of range",
            Self::ValueOffsetMisaligned => "Value offset is misaligned",
            Self::ValueUpdateNotAllowed => "Value update is not allowed",
            Self::DevNotOpened => "Device was not opened yet",
            Self::KeyAlreadyExists => "Key already exists",
        }
    }

    /// Whether the in-memory backends can ever produce this code.
    pub const fn is_reachable(self) -> bool {
        matches!(
            self,
            Self::KeyLengthInvalid
                | Self::KeyNotExist
                | Self::KeyAlreadyExists
                | Self::ParamInvalid
                | Self::ValueLengthInvalid
                | Self::ValueOffsetMisaligned
        )
    }
}

impl TryFrom<u16> for KvsError {
    type Error = u16;

    /// Map a raw device code to its error. Success (0) and unknown codes are
    /// returned unchanged as the error value.
    fn try_from(code: u16) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.code() == code)
            .ok_or(code)
    }
}

/// Look up the fixed message for a raw device code, including success.
pub fn kvs_strerror(code: u16) -> Option<&'static str> {
    if code == 0 {
        return Some(KVS_SUCCESS_MESSAGE);
    }
    KvsError::try_from(code).ok().map(KvsError::message)
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, KvsError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_fixed_message() {
        for err in KvsError::ALL {
            assert_eq!(err.to_string(), err.message());
        }
    }

    #[test]
    fn test_codes_are_dense_and_ordered() {
        for (i, err) in KvsError::ALL.iter().enumerate() {
            assert_eq!(usize::from(err.code()), i + 1);
        }
    }

    #[test]
    fn test_code_round_trip() {
        assert_eq!(KvsError::try_from(0x010), Ok(KvsError::KeyNotExist));
        assert_eq!(KvsError::try_from(0x016), Ok(KvsError::ValueOffsetMisaligned));
        assert_eq!(KvsError::try_from(0), Err(0));
        assert_eq!(KvsError::try_from(0x200), Err(0x200));
    }

    #[test]
    fn test_strerror_table() {
        assert_eq!(kvs_strerror(0), Some("Successful"));
        assert_eq!(kvs_strerror(0x00F), Some("Key is not valid"));
        assert_eq!(kvs_strerror(0x019), Some("Key already exists"));
        assert_eq!(kvs_strerror(0xFFFF), None);
    }

    #[test]
    fn test_reachable_codes() {
        let reachable: Vec<_> = KvsError::ALL
            .into_iter()
            .filter(|e| e.is_reachable())
            .collect();
        assert_eq!(reachable.len(), 6);
        assert!(!KvsError::BufferSmall.is_reachable());
        assert!(!KvsError::DevNotOpened.is_reachable());
    }
}
