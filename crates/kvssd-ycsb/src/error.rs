//! Error types for the row layer

use kvssd::KvsError;
use thiserror::Error;

/// Errors from encoding or decoding a row blob.
///
/// A decode failure means the stored bytes were not produced by
/// [`encode_row`](crate::codec::encode_row). It is a data-integrity fault
/// and never a device result code.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The blob ends inside the field record starting at `offset`
    #[error("Row blob truncated in field record at byte {offset}")]
    Truncated {
        /// Byte offset of the incomplete record
        offset: u64,
    },

    /// A field name or value is not UTF-8
    #[error("Field {part} at byte {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// `name` or `value`
        part: &'static str,
        /// Byte offset of the record holding the bad bytes
        offset: u64,
    },

    /// A field does not fit a 32-bit length prefix
    #[error("Field {part} is {len} bytes, larger than a 32-bit length prefix allows")]
    FieldTooLarge {
        /// `name` or `value`
        part: &'static str,
        /// Length in bytes
        len: usize,
    },

    /// Any other failure from the binary reader or writer
    #[error("Row binary format error: {0}")]
    Binary(#[from] binrw::Error),
}

/// Errors from row operations.
#[derive(Debug, Error)]
pub enum RowError {
    /// The device rejected the request
    #[error(transparent)]
    Device(#[from] KvsError),

    /// The row could not be encoded, or the stored blob is corrupt
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl RowError {
    /// The device error, if this is one.
    pub const fn device_error(&self) -> Option<KvsError> {
        match self {
            Self::Device(err) => Some(*err),
            Self::Codec(_) => None,
        }
    }

    /// Whether the key was not found.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Device(KvsError::KeyNotExist))
    }
}

/// Result type for row operations
pub type Result<T> = std::result::Result<T, RowError>;
