use crate::error::{Error, Result};
use crate::region::ByteRegion;
use crate::validate::{validate_view, ViewSource};
use tarray_storage::{ByteRepr, ByteStorage, Endian};

/// DataView reads and writes numbers of any width at any byte offset
/// of a region, in either byte order.
///
/// There is no alignment requirement, every access is checked
/// against the view bounds independently.
#[derive(Debug, Clone)]
pub struct DataView {
    region: ByteRegion,
    byte_offset: usize,
    byte_length: usize,
    storage: ByteStorage,
}

macro_rules! impl_byte_accessor {
    ($get:ident, $set:ident, $ty:ty) => {
        #[inline]
        pub fn $get(&self, byte_offset: usize) -> Result<$ty> {
            self.read(byte_offset, Endian::Big)
        }

        #[inline]
        pub fn $set(&self, byte_offset: usize, value: $ty) -> Result<()> {
            self.write(byte_offset, value, Endian::Big)
        }
    };
}

macro_rules! impl_endian_accessor {
    ($get:ident, $set:ident, $ty:ty) => {
        #[inline]
        pub fn $get(&self, byte_offset: usize, endian: Endian) -> Result<$ty> {
            self.read(byte_offset, endian)
        }

        #[inline]
        pub fn $set(&self, byte_offset: usize, value: $ty, endian: Endian) -> Result<()> {
            self.write(byte_offset, value, endian)
        }
    };
}

impl DataView {
    /// Construct a data view over region or byte storage.
    ///
    /// The view starts at `byte_offset` and covers `byte_length` bytes,
    /// or the rest of the region if `byte_length` is absent.
    pub fn new<'a, S: Into<ViewSource<'a>>>(
        source: S,
        byte_offset: Option<i64>,
        byte_length: Option<i64>,
    ) -> Result<Self> {
        match validate_view(&source.into(), byte_offset, byte_length, 1)? {
            Some(bounds) => Ok(DataView {
                region: bounds.region,
                byte_offset: bounds.byte_offset,
                byte_length: bounds.byte_length,
                storage: bounds.storage,
            }),
            None => Err(Error::InvalidArgument(
                "object must be a byte region or byte storage".to_string(),
            )),
        }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[inline]
    pub fn buffer(&self) -> &ByteRegion {
        &self.region
    }

    /// Decode a value of any width at given offset.
    #[inline]
    pub fn read<T: ByteRepr>(&self, byte_offset: usize, endian: Endian) -> Result<T> {
        self.check_access(byte_offset, T::WIDTH)?;
        Ok(self.storage.read(byte_offset, endian)?)
    }

    /// Encode a value of any width at given offset.
    #[inline]
    pub fn write<T: ByteRepr>(&self, byte_offset: usize, value: T, endian: Endian) -> Result<()> {
        self.check_access(byte_offset, T::WIDTH)?;
        self.storage
            .write(byte_offset, value, endian)
            .map_err(Error::from)
    }

    impl_byte_accessor!(get_int8, set_int8, i8);
    impl_byte_accessor!(get_uint8, set_uint8, u8);
    impl_endian_accessor!(get_int16, set_int16, i16);
    impl_endian_accessor!(get_uint16, set_uint16, u16);
    impl_endian_accessor!(get_int32, set_int32, i32);
    impl_endian_accessor!(get_uint32, set_uint32, u32);
    impl_endian_accessor!(get_int64, set_int64, i64);
    impl_endian_accessor!(get_uint64, set_uint64, u64);
    impl_endian_accessor!(get_float32, set_float32, f32);
    impl_endian_accessor!(get_float64, set_float64, f64);

    #[inline]
    fn check_access(&self, byte_offset: usize, width: usize) -> Result<()> {
        match byte_offset.checked_add(width) {
            Some(end) if end <= self.byte_length => Ok(()),
            _ => Err(Error::OffsetLengthOutOfRange),
        }
    }
}
