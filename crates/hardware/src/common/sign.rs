//! Two's-complement helpers.
//!
//! Relative branch displacements arrive as raw unsigned bytes or dwords. The
//! conversion clears the sign bit and subtracts its weight, which is the
//! textbook reading of a two's-complement value.

/// Reinterprets an 8-bit two's-complement value as signed.
///
/// # Arguments
///
/// * `value` - Raw byte, e.g. a `rel8` displacement.
///
/// # Returns
///
/// `value` unchanged if bit 7 is clear, otherwise `(value & 0x7F) - 0x80`.
#[inline]
pub const fn unsigned_to_signed_8(value: u8) -> i8 {
    if value & 0x80 == 0 {
        return value as i8;
    }
    ((value & 0x7F) as i16 - 0x80) as i8
}

/// Reinterprets a 32-bit two's-complement value as signed.
///
/// # Arguments
///
/// * `value` - Raw dword, e.g. a `rel32` displacement.
///
/// # Returns
///
/// `value` unchanged if bit 31 is clear, otherwise
/// `(value & 0x7FFF_FFFF) - 0x8000_0000`.
#[inline]
pub const fn unsigned_to_signed_32(value: u32) -> i32 {
    if value & 0x8000_0000 == 0 {
        return value as i32;
    }
    ((value & 0x7FFF_FFFF) as i64 - 0x8000_0000) as i32
}

/// Folds a signed byte back into the unsigned range.
///
/// Non-negative values are returned unchanged. A negative value maps to its
/// two's-complement byte halved, rounding up: `-63` (`0xC1`) becomes `0x61`.
///
/// This is not the inverse of [`unsigned_to_signed_8`]. The executor never
/// calls it; instruction handlers narrow values with `as` casts.
#[inline]
pub const fn signed_to_unsigned_8(value: i8) -> u8 {
    if value >= 0 {
        return value as u8;
    }
    let raw = value as u8 as u16;
    ((raw + 1) >> 1) as u8
}
