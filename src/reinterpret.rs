//! Bit reinterpretation: same bytes, different type, no conversion.

use std::mem;
use std::ptr;
use std::slice;

use log::trace;

use crate::error::TourError;

/// Primitive numeric types for which every bit pattern is a valid value.
///
/// # Safety
///
/// Implementors must have no padding, no invalid bit patterns and no
/// interior pointers. `bool`, `char` and references do not qualify.
pub unsafe trait PlainBits: Copy + 'static {}

macro_rules! plain_bits {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl PlainBits for $ty {})*
    };
}

plain_bits!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// Reads the bits of `value` as a `U`.
///
/// Fails only when the two types differ in width; any equal-width pair of
/// [`PlainBits`] types is well defined at the bit level, although the number
/// you get back is usually meaningless.
pub fn reinterpret<T: PlainBits, U: PlainBits>(value: &T) -> Result<U, TourError> {
    if mem::size_of::<T>() != mem::size_of::<U>() {
        return Err(TourError::size_mismatch::<T, U>());
    }
    // SAFETY: equal widths, and every bit pattern of U is valid.
    let out = unsafe { reinterpret_unchecked::<T, U>(value) };
    trace!(
        "reinterpreted {} as {}",
        std::any::type_name::<T>(),
        std::any::type_name::<U>()
    );
    Ok(out)
}

/// Casts the address of `value` to `*const U` and reads through it.
///
/// # Safety
///
/// `U` must not be wider than `T`, and the leading bytes of `value` must form
/// a valid `U`.
pub unsafe fn reinterpret_unchecked<T, U>(value: &T) -> U {
    ptr::read_unaligned((value as *const T).cast::<U>())
}

/// The bytes of `value` as they sit in memory, lowest address first.
pub fn byte_view<T: PlainBits>(value: &T) -> Vec<u8> {
    // SAFETY: PlainBits types have no padding, so all size_of::<T>() bytes
    // are initialized.
    let bytes =
        unsafe { slice::from_raw_parts((value as *const T).cast::<u8>(), mem::size_of::<T>()) };
    bytes.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_int_bits_as_float() {
        let f: f64 = reinterpret(&42i64).unwrap();
        assert_eq!(f.to_bits(), 42);
        assert_eq!(f, f64::from_bits(42));
        assert!(f.is_subnormal());
        assert_eq!(format!("{f:.6}"), "0.000000");
        assert_eq!(format!("{f:e}"), "2.08e-322");
    }

    #[test]
    fn test_float_bits_as_int() {
        let i: i64 = reinterpret(&3.1415f64).unwrap();
        assert_eq!(i, 4614256447914709615);
        assert_eq!(i, 3.1415f64.to_bits() as i64);
    }

    #[test]
    fn test_f32_one_bits() {
        let bits: u32 = reinterpret(&1.0f32).unwrap();
        assert_eq!(bits, 0x3f80_0000);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let result: Result<f64, _> = reinterpret(&42i32);
        assert_eq!(result, Err(TourError::size_mismatch::<i32, f64>()));
    }

    #[test]
    fn test_unchecked_reads_leading_bytes() {
        let value: u64 = 0x1122_3344_5566_7788;
        let low: u32 = unsafe { reinterpret_unchecked(&value) };
        if cfg!(target_endian = "little") {
            assert_eq!(low, 0x5566_7788);
        } else {
            assert_eq!(low, 0x1122_3344);
        }
    }

    #[test]
    fn test_byte_view_follows_endianness() {
        let bytes = byte_view(&0x1234_5678u32);
        assert_eq!(bytes, 0x1234_5678u32.to_ne_bytes().to_vec());
        assert_eq!(byte_view(&42i64).len(), 8);
    }

    proptest! {
        #[test]
        fn prop_reinterpret_round_trip(original in any::<i64>()) {
            let as_float: f64 = reinterpret(&original).unwrap();
            let back: i64 = reinterpret(&as_float).unwrap();
            prop_assert_eq!(back, original);
        }
    }
}
