//! 4-bit frame codec.
//!
//! Two pixels per byte, first pixel in the high nibble. Only the low four
//! bits of each index are kept. An odd pixel count leaves the low nibble of
//! the final byte zero.

/// Bytes needed to hold `pixels` packed indices.
#[inline]
pub fn packed_len(pixels: usize) -> usize {
    pixels.div_ceil(2)
}

/// Pack palette indices two per byte.
///
/// ```
/// use eink_dither::pack_nibbles;
///
/// assert_eq!(pack_nibbles(&[1, 2, 3, 4]), vec![0x12, 0x34]);
/// assert_eq!(pack_nibbles(&[5]), vec![0x50]);
/// ```
pub fn pack_nibbles(indices: &[u8]) -> Vec<u8> {
    indices
        .chunks(2)
        .map(|pair| {
            let hi = pair[0] & 0x0F;
            let lo = pair.get(1).map_or(0, |v| v & 0x0F);
            (hi << 4) | lo
        })
        .collect()
}

/// Expand a packed frame back into one index per byte.
///
/// Always yields `2 * packed.len()` values; the padding nibble of an
/// odd-length frame comes back as a trailing zero.
pub fn unpack_nibbles(packed: &[u8]) -> Vec<u8> {
    let mut indices = Vec::with_capacity(packed.len() * 2);
    for &byte in packed {
        indices.push(byte >> 4);
        indices.push(byte & 0x0F);
    }
    indices
}
