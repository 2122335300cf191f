use crate::error::{Error, Result};
use bytemuck::{Pod, Zeroable};

/// Used internally to make sure all memory allocations
/// are aligned to 16 bytes.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct U128(u128);

// SAFETY
//
// U128 wraps a single u128 with identical size and alignment,
// so it has no padding and every bit pattern is valid.
unsafe impl Zeroable for U128 {}
unsafe impl Pod for U128 {}

pub const ALIGNMENT: usize = 16;

/// Largest byte capacity of a single allocation.
pub const MAX_CAP: usize = isize::MAX as usize & !(ALIGNMENT - 1);

/// align length to 16 bytes, `None` on overflow.
#[inline]
pub fn align_u128(v: usize) -> Option<usize> {
    align_up(v, ALIGNMENT)
}

/// Round `v` up to multiple of `align`, which must be power of two.
/// Returns `None` on overflow.
#[inline]
pub fn align_up(v: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    v.checked_add(align - 1).map(|n| n & !(align - 1))
}

/// RawArray is a fixed-size, zero-filled byte block aligned to 16 bytes.
///
/// Unlike a growable vector, a raw array never reallocates, so
/// any offset computed against it stays valid for its whole life.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RawArray {
    inner: Box<[U128]>,
}

impl RawArray {
    /// Create a zero-filled raw array with at least given capacity.
    /// Note: capacity is always aligned to multiple of 16.
    ///
    /// Fails if capacity exceeds [`MAX_CAP`].
    #[inline]
    pub fn zeroed(cap_u8: usize) -> Result<Self> {
        let cap_u128 = match align_u128(cap_u8) {
            Some(cap) if cap <= MAX_CAP => cap / ALIGNMENT,
            _ => return Err(Error::InvalidArgument("allocation size exceeds limit")),
        };
        Ok(RawArray {
            inner: vec![U128(0); cap_u128].into_boxed_slice(),
        })
    }

    /// Returns byte capacity.
    #[inline]
    pub fn cap_u8(&self) -> usize {
        self.inner.len() * ALIGNMENT
    }

    /// Returns immutable byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.inner)
    }

    /// Returns mutable byte slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.inner)
    }
}
