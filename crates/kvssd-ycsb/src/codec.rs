//! Row blob format
//!
//! A row is stored as a single device value: its fields in order, each as
//! a little-endian length-prefixed name followed by a length-prefixed value.
//!
//! ```text
//! u32 name_len | name | u32 value_len | value | u32 name_len | ...
//! ```
//!
//! There is no field count or terminator. The decoder reads records until
//! the blob is consumed exactly, so an empty row is an empty blob.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::error::CodecError;
use crate::field::Field;

/// One encoded field.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FieldRecord {
    /// Name length in bytes
    pub name_len: u32,

    /// Name bytes
    #[br(count = name_len)]
    pub name: Vec<u8>,

    /// Value length in bytes
    pub value_len: u32,

    /// Value bytes
    #[br(count = value_len)]
    pub value: Vec<u8>,
}

impl FieldRecord {
    /// Build the record for `field`.
    pub fn from_field(field: &Field) -> Result<Self, CodecError> {
        Ok(Self {
            name_len: prefix("name", field.name.len())?,
            name: field.name.as_bytes().to_vec(),
            value_len: prefix("value", field.value.len())?,
            value: field.value.as_bytes().to_vec(),
        })
    }

    /// Encoded size of the record.
    pub fn encoded_len(&self) -> usize {
        8 + self.name.len() + self.value.len()
    }

    fn into_field(self, offset: u64) -> Result<Field, CodecError> {
        let name = String::from_utf8(self.name)
            .map_err(|_| CodecError::InvalidUtf8 { part: "name", offset })?;
        let value = String::from_utf8(self.value)
            .map_err(|_| CodecError::InvalidUtf8 { part: "value", offset })?;
        Ok(Field { name, value })
    }
}

fn prefix(part: &'static str, len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::FieldTooLarge { part, len })
}

/// Encode `fields` into a row blob.
pub fn encode_row(fields: &[Field]) -> Result<Vec<u8>, CodecError> {
    let records = fields
        .iter()
        .map(FieldRecord::from_field)
        .collect::<Result<Vec<_>, _>>()?;
    let size = records.iter().map(FieldRecord::encoded_len).sum();
    let mut cursor = Cursor::new(Vec::with_capacity(size));

    for record in &records {
        record.write(&mut cursor)?;
    }

    Ok(cursor.into_inner())
}

/// Decode a row blob produced by [`encode_row`].
pub fn decode_row(blob: &[u8]) -> Result<Vec<Field>, CodecError> {
    let end = blob.len() as u64;
    let mut cursor = Cursor::new(blob);
    let mut fields = Vec::new();

    while cursor.position() < end {
        let offset = cursor.position();
        let record = FieldRecord::read(&mut cursor).map_err(|err| {
            if err.is_eof() {
                CodecError::Truncated { offset }
            } else {
                CodecError::Binary(err)
            }
        })?;
        fields.push(record.into_field(offset)?);
    }

    Ok(fields)
}
