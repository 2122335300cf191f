//! Offset arithmetic shared by regions and views.
//!
//! Offsets and lengths arrive as arbitrary numbers: possibly
//! fractional, negative or NaN. These helpers turn them into
//! absolute byte or element positions.
use crate::error::{Error, Result};

/// Numeric input which can be coerced to an integer.
pub trait ToInt: Copy {
    /// Floor the value. NaN and infinities become zero.
    fn to_int(self) -> i64;
}

macro_rules! impl_signed_to_int {
    ($ty:ty) => {
        impl ToInt for $ty {
            #[inline]
            fn to_int(self) -> i64 {
                self as i64
            }
        }
    };
}

macro_rules! impl_unsigned_to_int {
    ($ty:ty) => {
        impl ToInt for $ty {
            #[inline]
            fn to_int(self) -> i64 {
                i64::try_from(self).unwrap_or(i64::MAX)
            }
        }
    };
}

impl_signed_to_int!(i8);
impl_signed_to_int!(i16);
impl_signed_to_int!(i32);
impl_signed_to_int!(i64);
impl_signed_to_int!(isize);
impl_unsigned_to_int!(u8);
impl_unsigned_to_int!(u16);
impl_unsigned_to_int!(u32);
impl_unsigned_to_int!(u64);
impl_unsigned_to_int!(usize);

impl ToInt for f64 {
    #[inline]
    fn to_int(self) -> i64 {
        if self.is_finite() {
            // float to int cast saturates
            self.floor() as i64
        } else {
            0
        }
    }
}

impl ToInt for f32 {
    #[inline]
    fn to_int(self) -> i64 {
        f64::from(self).to_int()
    }
}

/// Coerce optional input to a non-negative integer.
///
/// Absent value falls back to `default`, and fails if there is no default.
/// Fails if the floored value is negative.
#[inline]
pub fn positive_int<T: ToInt>(value: Option<T>, label: &str, default: Option<usize>) -> Result<usize> {
    let res = match value {
        None => default,
        Some(v) => usize::try_from(v.to_int()).ok(),
    };
    res.ok_or_else(|| Error::InvalidArgument(format!("{} must be a positive integer", label)))
}

/// Resolve optional relative offset against `length`.
///
/// Absent value falls back to `default`, or `length` if there is no default.
/// Negative value counts backward from `length`. The result is clamped
/// into `[0, length]`.
#[inline]
pub fn abs_offset<T: ToInt>(value: Option<T>, length: usize, default: Option<usize>) -> usize {
    let v = match value {
        None => return default.unwrap_or(length),
        Some(v) => v.to_int(),
    };
    let len = i64::try_from(length).unwrap_or(i64::MAX);
    let v = if v < 0 { len.saturating_add(v) } else { v };
    // clamped into [0, length], cast back is lossless.
    v.clamp(0, len) as usize
}

/// Returns true if `value` is multiple of `align`, which must be power of two.
#[inline]
pub fn check_alignment(value: usize, align: usize) -> bool {
    debug_assert!(align.is_power_of_two());
    value & (align - 1) == 0
}
