//! Conversions between bytes and unpacked bits.
//!
//! Unpacked bits are `u8` values equal to 0 or 1, one per element. Both the
//! big-endian (MSB first) and little-endian (LSB first) orderings inside each
//! byte are supported. When packing, any non-zero element counts as a one,
//! and a trailing group of fewer than 8 bits is completed with zeros.

/// Unpacks a byte into 8 bits, MSB first.
///
/// # Examples
/// ```
/// # use ldpc802::bits::byte_to_bits_be;
/// assert_eq!(byte_to_bits_be(0xb4), [1, 0, 1, 1, 0, 1, 0, 0]);
/// ```
pub fn byte_to_bits_be(byte: u8) -> [u8; 8] {
    std::array::from_fn(|j| (byte >> (7 - j)) & 1)
}

/// Unpacks a byte into 8 bits, LSB first.
pub fn byte_to_bits_le(byte: u8) -> [u8; 8] {
    std::array::from_fn(|j| (byte >> j) & 1)
}

/// Packs up to 8 bits, MSB first, into a byte.
///
/// Missing trailing bits are taken as zero. Bits beyond the eighth are
/// ignored.
pub fn bits_to_byte_be(bits: &[u8]) -> u8 {
    bits.iter()
        .take(8)
        .enumerate()
        .fold(0, |acc, (j, &b)| acc | (u8::from(b != 0) << (7 - j)))
}

/// Packs up to 8 bits, LSB first, into a byte.
pub fn bits_to_byte_le(bits: &[u8]) -> u8 {
    bits.iter()
        .take(8)
        .enumerate()
        .fold(0, |acc, (j, &b)| acc | (u8::from(b != 0) << j))
}

/// Unpacks a byte slice into bits, MSB first.
pub fn bytes_to_bits_be(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|&b| byte_to_bits_be(b)).collect()
}

/// Unpacks a byte slice into bits, LSB first.
pub fn bytes_to_bits_le(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|&b| byte_to_bits_le(b)).collect()
}

/// Packs bits into bytes, MSB first.
///
/// # Examples
/// ```
/// # use ldpc802::bits::bits_to_bytes_be;
/// assert_eq!(bits_to_bytes_be(&[1, 0, 0, 0, 0, 0, 0, 1, 1, 1]), [0x81, 0xc0]);
/// ```
pub fn bits_to_bytes_be(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8).map(bits_to_byte_be).collect()
}

/// Packs bits into bytes, LSB first.
pub fn bits_to_bytes_le(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8).map(bits_to_byte_le).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn big_endian_vectors() {
        assert_eq!(byte_to_bits_be(173), [1, 0, 1, 0, 1, 1, 0, 1]);
        assert_eq!(byte_to_bits_be(89), [0, 1, 0, 1, 1, 0, 0, 1]);
        assert_eq!(byte_to_bits_be(217), [1, 1, 0, 1, 1, 0, 0, 1]);
        assert_eq!(byte_to_bits_be(135), [1, 0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn little_endian_is_reversed() {
        for b in [0u8, 1, 173, 89, 255] {
            let mut be = byte_to_bits_be(b);
            be.reverse();
            assert_eq!(byte_to_bits_le(b), be);
        }
    }

    #[test]
    fn byte_round_trip() {
        for b in 0..=255u8 {
            assert_eq!(bits_to_byte_be(&byte_to_bits_be(b)), b);
            assert_eq!(bits_to_byte_le(&byte_to_bits_le(b)), b);
        }
    }

    #[test]
    fn slices() {
        let bytes = [0x12, 0xfe, 0x00, 0x81];
        let be = bytes_to_bits_be(&bytes);
        assert_eq!(be.len(), 32);
        assert_eq!(&be[..8], &[0, 0, 0, 1, 0, 0, 1, 0]);
        assert_eq!(bits_to_bytes_be(&be), bytes);
        assert_eq!(bits_to_bytes_le(&bytes_to_bits_le(&bytes)), bytes);
    }

    #[test]
    fn partial_byte() {
        assert_eq!(bits_to_bytes_le(&[1, 1, 0, 1]), [0x0b]);
        assert_eq!(bits_to_byte_be(&[]), 0);
        assert_eq!(bits_to_byte_be(&[2, 0, 7]), 0xa0);
    }
}
