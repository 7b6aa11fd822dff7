//! Little-endian conversion between unsigned integers and fixed-width byte strings.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::CatfishError;

/// Encodes `value` as exactly `width` little-endian bytes.
///
/// Fails if `value` does not fit in `width` bytes; the caller gets a typed error rather than a
/// silently truncated (and therefore wrong) result.
pub fn int_to_bytes(value: &BigUint, width: usize) -> Result<Vec<u8>, CatfishError> {
    let mut le = value.to_bytes_le();
    if le.len() > width {
        return Err(CatfishError::IntegerTooWide { width });
    }
    le.resize(width, 0);
    Ok(le)
}

/// Interprets `buf` as a little-endian unsigned integer.
pub fn bytes_to_int(buf: &[u8]) -> BigUint {
    if buf.is_empty() {
        return BigUint::zero();
    }
    BigUint::from_bytes_le(buf)
}
