//! Compact index encoding.
//!
//! Every count and index in a package (array lengths, name table indices,
//! object references) is stored as a compact index: a signed 32-bit value
//! packed into 1 to 5 bytes.
//!
//! ## Layout
//!
//! ```text
//! byte 0      S C m m m m m m   S = sign, C = continuation, m = bits 0..6
//! byte 1..3   C m m m m m m m   next 7 magnitude bits each (shift 6, 13, 20)
//! byte 4      m m m m m m m m   final 8 magnitude bits (shift 27), no flag
//! ```
//!
//! The value is stored as sign + magnitude, so `i32::MIN` is representable
//! (magnitude 2^31 in the last byte).

use crate::error::{Error, Result};
use bytes::BufMut;

/// Maximum encoded length of a compact index
pub const MAX_COMPACT_LEN: usize = 5;

const SIGN_BIT: u8 = 0x80;
const FIRST_CONTINUE_BIT: u8 = 0x40;
const FIRST_MAGNITUDE_MASK: u8 = 0x3F;
const CONTINUE_BIT: u8 = 0x80;
const MAGNITUDE_MASK: u8 = 0x7F;

/// Returns the number of bytes `value` occupies on the wire.
pub fn encoded_len(value: i32) -> usize {
    let mut magnitude = value.unsigned_abs() >> 6;
    let mut len = 1;
    while magnitude > 0 && len < MAX_COMPACT_LEN {
        magnitude >>= 7;
        len += 1;
    }
    len
}

/// Encode `value` into `buf`.
///
/// Returns the number of bytes written.
pub fn encode(value: i32, buf: &mut impl BufMut) -> usize {
    let mut magnitude = value.unsigned_abs();

    let mut first = (magnitude as u8) & FIRST_MAGNITUDE_MASK;
    if value < 0 {
        first |= SIGN_BIT;
    }
    magnitude >>= 6;
    if magnitude > 0 {
        first |= FIRST_CONTINUE_BIT;
    }
    buf.put_u8(first);

    let mut len = 1;
    while magnitude > 0 {
        if len == MAX_COMPACT_LEN - 1 {
            // last byte carries a full 8 bits
            buf.put_u8(magnitude as u8);
            return len + 1;
        }
        let mut byte = (magnitude as u8) & MAGNITUDE_MASK;
        magnitude >>= 7;
        if magnitude > 0 {
            byte |= CONTINUE_BIT;
        }
        buf.put_u8(byte);
        len += 1;
    }
    len
}

/// Decode a compact index from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed.
pub fn decode(data: &[u8]) -> Result<(i32, usize)> {
    let mut bytes = data.iter().copied();
    let mut consumed = 0;
    let value = decode_with(0, || {
        let byte = bytes.next().ok_or(Error::CompactIndexTruncated {
            offset: consumed as u64,
        })?;
        consumed += 1;
        Ok(byte)
    })?;
    Ok((value, consumed))
}

/// Decode a compact index pulling bytes from `next_byte`.
///
/// `offset` is only used to annotate errors.
pub(crate) fn decode_with(offset: u64, mut next_byte: impl FnMut() -> Result<u8>) -> Result<i32> {
    let first = next_byte()?;
    let mut magnitude = u64::from(first & FIRST_MAGNITUDE_MASK);

    if first & FIRST_CONTINUE_BIT != 0 {
        let mut shift = 6;
        for index in 1..MAX_COMPACT_LEN {
            let byte = next_byte()?;
            if index == MAX_COMPACT_LEN - 1 {
                magnitude |= u64::from(byte) << shift;
                break;
            }
            magnitude |= u64::from(byte & MAGNITUDE_MASK) << shift;
            shift += 7;
            if byte & CONTINUE_BIT == 0 {
                break;
            }
        }
    }

    if first & SIGN_BIT != 0 {
        if magnitude > 1 << 31 {
            return Err(Error::CompactIndexOverflow { offset });
        }
        Ok((-(magnitude as i64)) as i32)
    } else {
        i32::try_from(magnitude).map_err(|_| Error::CompactIndexOverflow { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode_to_vec(value: i32) -> Vec<u8> {
        let mut buf = BytesMut::new();
        let len = encode(value, &mut buf);
        assert_eq!(len, buf.len());
        buf.to_vec()
    }

    #[test]
    fn test_encode_single_byte() {
        assert_eq!(encode_to_vec(0), [0x00]);
        assert_eq!(encode_to_vec(1), [0x01]);
        assert_eq!(encode_to_vec(63), [0x3F]);
        assert_eq!(encode_to_vec(-1), [0x81]);
        assert_eq!(encode_to_vec(-63), [0xBF]);
    }

    #[test]
    fn test_encode_multi_byte() {
        assert_eq!(encode_to_vec(64), [0x40, 0x01]);
        assert_eq!(encode_to_vec(-64), [0xC0, 0x01]);
        assert_eq!(encode_to_vec(8191), [0x7F, 0x7F]);
        assert_eq!(encode_to_vec(8192), [0x40, 0x80, 0x01]);
        assert_eq!(encode_to_vec(i32::MIN), [0xC0, 0x80, 0x80, 0x80, 0x10]);
        assert_eq!(encode_to_vec(i32::MAX), [0x7F, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_decode_multi_byte() {
        assert_eq!(decode(&[0x40, 0x80, 0x01]).unwrap(), (8192, 3));
        assert_eq!(decode(&[0xC0, 0x01, 0xFF]).unwrap(), (-64, 2));
        assert_eq!(
            decode(&[0xC0, 0x80, 0x80, 0x80, 0x10]).unwrap(),
            (i32::MIN, 5)
        );
    }

    #[test]
    fn test_round_trip_boundaries() {
        let mut samples = vec![0, 1, -1, 63, 64, -64, 8191, 8192, i32::MAX, i32::MIN];
        for bits in [6, 13, 20, 27] {
            let edge = 1i32 << bits;
            samples.extend([edge - 1, edge, -(edge - 1), -edge]);
        }
        for value in samples {
            let bytes = encode_to_vec(value);
            assert!((1..=MAX_COMPACT_LEN).contains(&bytes.len()));
            assert_eq!(bytes.len(), encoded_len(value), "length of {}", value);
            assert_eq!(decode(&bytes).unwrap(), (value, bytes.len()), "value {}", value);
        }
    }

    #[test]
    fn test_round_trip_sweep() {
        let mut value: i64 = i32::MIN as i64;
        while value <= i32::MAX as i64 {
            let v = value as i32;
            let bytes = encode_to_vec(v);
            assert_eq!(decode(&bytes).unwrap().0, v);
            value += 65_521;
        }
    }

    #[test]
    fn test_negative_zero_decodes_as_zero() {
        assert_eq!(decode(&[0x80]).unwrap(), (0, 1));
    }

    #[test]
    fn test_decode_overflow() {
        let err = decode(&[0x40, 0x80, 0x80, 0x80, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::CompactIndexOverflow { .. }));

        let err = decode(&[0xC0, 0x80, 0x80, 0x80, 0x11]).unwrap_err();
        assert!(matches!(err, Error::CompactIndexOverflow { .. }));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode(&[]).unwrap_err(),
            Error::CompactIndexTruncated { offset: 0 }
        ));
        assert!(matches!(
            decode(&[0x40, 0x80]).unwrap_err(),
            Error::CompactIndexTruncated { offset: 2 }
        ));
    }
}
