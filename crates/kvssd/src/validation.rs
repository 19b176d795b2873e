//! Request validation against device constraints
//!
//! Checks run in a fixed order and stop at the first failure, so a request
//! with several problems always reports the same code.

use crate::error::{KvsError, Result};
use crate::types::{
    ALIGNMENT_UNIT, KvsKey, KvsValue, MAX_KEY_LENGTH, MAX_VALUE_LENGTH, MIN_KEY_LENGTH, OwnedValue,
};

/// Validate a key and, for writes, the value that goes with it.
///
/// Order: key length, key buffer, value length, value offset alignment,
/// value buffer.
pub fn validate_request(key: &KvsKey<'_>, value: Option<&KvsValue<'_>>) -> Result<()> {
    validate_key(key)?;
    if let Some(value) = value {
        validate_value(value)?;
    }
    Ok(())
}

/// Validate a key and return its content.
pub fn checked_key<'a>(key: &KvsKey<'a>) -> Result<&'a [u8]> {
    validate_key(key)?;
    key.as_bytes().ok_or(KvsError::ParamInvalid)
}

/// Validate a write request and copy its value into device-owned memory.
///
/// The copy is taken before any device lock is acquired.
pub fn checked_write<'a>(key: &KvsKey<'a>, value: &KvsValue<'_>) -> Result<(&'a [u8], OwnedValue)> {
    let key = checked_key(key)?;
    validate_value(value)?;
    let value = OwnedValue::copy_from(value).ok_or(KvsError::ParamInvalid)?;
    Ok((key, value))
}

/// Validate a key descriptor on its own.
pub fn validate_key(key: &KvsKey<'_>) -> Result<()> {
    if key.length < MIN_KEY_LENGTH || key.length > MAX_KEY_LENGTH {
        return Err(KvsError::KeyLengthInvalid);
    }
    if key.as_bytes().is_none() {
        return Err(KvsError::ParamInvalid);
    }
    Ok(())
}

/// Validate a value descriptor on its own.
pub fn validate_value(value: &KvsValue<'_>) -> Result<()> {
    if value.length > MAX_VALUE_LENGTH {
        return Err(KvsError::ValueLengthInvalid);
    }
    if value.offset % ALIGNMENT_UNIT != 0 {
        return Err(KvsError::ValueOffsetMisaligned);
    }
    if value.length > 0 && value.as_bytes().is_none() {
        return Err(KvsError::ParamInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_length_bounds() {
        assert_eq!(validate_key(&KvsKey::new(b"abc")), Err(KvsError::KeyLengthInvalid));
        assert_eq!(validate_key(&KvsKey::new(b"abcd")), Ok(()));
        assert_eq!(validate_key(&KvsKey::new(&[7u8; 255])), Ok(()));
        assert_eq!(validate_key(&KvsKey::new(&[7u8; 256])), Err(KvsError::KeyLengthInvalid));
    }

    #[test]
    fn test_null_key_buffer() {
        assert_eq!(validate_key(&KvsKey::from_raw(None, 8)), Err(KvsError::ParamInvalid));
        assert_eq!(
            validate_key(&KvsKey::from_raw(Some(&b"abc"[..]), 8)),
            Err(KvsError::ParamInvalid)
        );
    }

    #[test]
    fn test_value_checks() {
        let too_long = KvsValue::from_raw(None, MAX_VALUE_LENGTH + 1, 0, 0);
        assert_eq!(validate_value(&too_long), Err(KvsError::ValueLengthInvalid));

        let misaligned = KvsValue::new(b"data").with_offset(100);
        assert_eq!(validate_value(&misaligned), Err(KvsError::ValueOffsetMisaligned));

        let null = KvsValue::from_raw(None, 4, 4, 0);
        assert_eq!(validate_value(&null), Err(KvsError::ParamInvalid));

        let empty = KvsValue::from_raw(None, 0, 0, 0);
        assert_eq!(validate_value(&empty), Ok(()));

        let aligned = KvsValue::new(b"data").with_offset(ALIGNMENT_UNIT * 3);
        assert_eq!(validate_value(&aligned), Ok(()));
    }

    #[test]
    fn test_max_value_length_accepted() {
        let data = vec![0u8; MAX_VALUE_LENGTH as usize];
        assert_eq!(validate_value(&KvsValue::new(&data)), Ok(()));
    }

    #[test]
    fn test_error_precedence() {
        // Short key wins over a misaligned offset
        let value = KvsValue::new(b"data").with_offset(1);
        assert_eq!(
            validate_request(&KvsKey::new(b"k"), Some(&value)),
            Err(KvsError::KeyLengthInvalid)
        );

        // Key length wins over a null key buffer
        assert_eq!(
            validate_request(&KvsKey::from_raw(None, 2), None),
            Err(KvsError::KeyLengthInvalid)
        );

        // Value length wins over offset, offset wins over a null buffer
        let value = KvsValue::from_raw(None, MAX_VALUE_LENGTH + 1, 0, 3);
        assert_eq!(
            validate_request(&KvsKey::new(b"key1"), Some(&value)),
            Err(KvsError::ValueLengthInvalid)
        );
        let value = KvsValue::from_raw(None, 16, 16, 3);
        assert_eq!(
            validate_request(&KvsKey::new(b"key1"), Some(&value)),
            Err(KvsError::ValueOffsetMisaligned)
        );
    }

    proptest! {
        #[test]
        fn key_length_outside_bounds_is_rejected(len in prop_oneof![0usize..MIN_KEY_LENGTH, (MAX_KEY_LENGTH + 1)..1024]) {
            let key = vec![b'k'; len];
            prop_assert_eq!(validate_key(&KvsKey::new(&key)), Err(KvsError::KeyLengthInvalid));
        }

        #[test]
        fn key_length_inside_bounds_is_accepted(len in MIN_KEY_LENGTH..=MAX_KEY_LENGTH) {
            let key = vec![b'k'; len];
            prop_assert_eq!(validate_key(&KvsKey::new(&key)), Ok(()));
        }

        #[test]
        fn only_aligned_offsets_pass(offset in any::<u32>()) {
            let result = validate_value(&KvsValue::new(b"v").with_offset(offset));
            if offset % ALIGNMENT_UNIT == 0 {
                prop_assert_eq!(result, Ok(()));
            } else {
                prop_assert_eq!(result, Err(KvsError::ValueOffsetMisaligned));
            }
        }
    }
}
