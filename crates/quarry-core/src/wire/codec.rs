//! Memcomparable encodings for wire-expression values.
//!
//! Encoded integers and floats compare byte-wise in the same order as the
//! values they encode, which lets storage evaluate range predicates without
//! decoding.

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use quarry_common::utils::error::{Error, Result};

const SIGN_MASK: u64 = 1 << 63;

/// Encodes a signed integer: big-endian with the sign bit flipped.
#[must_use]
pub fn encode_int(v: i64) -> Bytes {
    encode_u64((v as u64) ^ SIGN_MASK)
}

/// Decodes a value written by [`encode_int`].
pub fn decode_int(buf: &[u8]) -> Result<i64> {
    Ok((decode_u64(buf)? ^ SIGN_MASK) as i64)
}

/// Encodes an unsigned integer as plain big-endian.
#[must_use]
pub fn encode_uint(v: u64) -> Bytes {
    encode_u64(v)
}

/// Decodes a value written by [`encode_uint`].
pub fn decode_uint(buf: &[u8]) -> Result<u64> {
    decode_u64(buf)
}

/// Encodes a float so that byte order matches numeric order.
///
/// Non-negative values get the sign bit set; negative values have every bit
/// inverted.
#[must_use]
pub fn encode_float(v: f64) -> Bytes {
    let bits = v.to_bits();
    let bits = if bits & SIGN_MASK == 0 {
        bits | SIGN_MASK
    } else {
        !bits
    };
    encode_u64(bits)
}

/// Decodes a value written by [`encode_float`].
pub fn decode_float(buf: &[u8]) -> Result<f64> {
    let bits = decode_u64(buf)?;
    let bits = if bits & SIGN_MASK == 0 {
        !bits
    } else {
        bits & !SIGN_MASK
    };
    Ok(f64::from_bits(bits))
}

fn encode_u64(v: u64) -> Bytes {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, v);
    Bytes::copy_from_slice(&buf)
}

fn decode_u64(buf: &[u8]) -> Result<u64> {
    if buf.len() != 8 {
        return Err(Error::Codec(format!(
            "expected 8-byte value, found {} bytes",
            buf.len()
        )));
    }
    Ok(BigEndian::read_u64(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_order_is_preserved() {
        let values = [i64::MIN, -1000, -1, 0, 1, 42, i64::MAX];
        let encoded: Vec<Bytes> = values.iter().map(|&v| encode_int(v)).collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));
        for (v, e) in values.iter().zip(&encoded) {
            assert_eq!(decode_int(e).unwrap(), *v);
        }
    }

    #[test]
    fn test_float_order_is_preserved() {
        let values = [f64::NEG_INFINITY, -2.5, -0.5, 0.0, 0.25, 3.0, f64::INFINITY];
        let encoded: Vec<Bytes> = values.iter().map(|&v| encode_float(v)).collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));
        for (v, e) in values.iter().zip(&encoded) {
            assert_eq!(decode_float(e).unwrap().to_bits(), v.to_bits());
        }
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert!(matches!(decode_int(&[1, 2, 3]), Err(Error::Codec(_))));
    }
}
