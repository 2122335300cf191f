use bytemuck::Pod;
use smallvec::SmallVec;
use std::mem::size_of;

/// Byte order used to encode multi-byte values.
///
/// Big endian is the default, matching network order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl Endian {
    /// Byte order of the running platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    #[inline]
    pub fn from_little(little_endian: bool) -> Self {
        if little_endian {
            Endian::Little
        } else {
            Endian::Big
        }
    }
}

/// Fixed-width numeric value that can be encoded to and decoded
/// from raw bytes in either byte order.
pub trait ByteRepr: Pod + Default {
    /// Number of bytes of encoded value.
    const WIDTH: usize;

    /// Convert value to byte vector.
    fn to_bytes(&self, endian: Endian) -> SmallVec<[u8; 8]>;

    /// Convert bytes to value.
    /// Only first `WIDTH` bytes are used, caller must guarantee the
    /// input is long enough.
    fn from_bytes(bs: &[u8], endian: Endian) -> Self;

    /// Write value into first `WIDTH` bytes of the buffer.
    fn write_bytes(&self, buf: &mut [u8], endian: Endian);
}

macro_rules! impl_num_for_byte_repr {
    ($ty:ty) => {
        impl ByteRepr for $ty {
            const WIDTH: usize = size_of::<$ty>();

            #[inline]
            fn to_bytes(&self, endian: Endian) -> SmallVec<[u8; 8]> {
                match endian {
                    Endian::Big => self.to_be_bytes().into_iter().collect(),
                    Endian::Little => self.to_le_bytes().into_iter().collect(),
                }
            }

            #[inline]
            fn from_bytes(bs: &[u8], endian: Endian) -> Self {
                let mut raw = [0u8; size_of::<$ty>()];
                raw.copy_from_slice(&bs[..size_of::<$ty>()]);
                match endian {
                    Endian::Big => <$ty>::from_be_bytes(raw),
                    Endian::Little => <$ty>::from_le_bytes(raw),
                }
            }

            #[inline]
            fn write_bytes(&self, buf: &mut [u8], endian: Endian) {
                let bs = match endian {
                    Endian::Big => self.to_be_bytes(),
                    Endian::Little => self.to_le_bytes(),
                };
                buf[..size_of::<$ty>()].copy_from_slice(&bs);
            }
        }
    };
}

impl_num_for_byte_repr!(i8);
impl_num_for_byte_repr!(u8);
impl_num_for_byte_repr!(i16);
impl_num_for_byte_repr!(u16);
impl_num_for_byte_repr!(i32);
impl_num_for_byte_repr!(u32);
impl_num_for_byte_repr!(i64);
impl_num_for_byte_repr!(u64);
impl_num_for_byte_repr!(f32);
impl_num_for_byte_repr!(f64);
