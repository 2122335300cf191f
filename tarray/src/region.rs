use crate::error::Result;
use crate::offset::{abs_offset, positive_int, ToInt};
use tarray_storage::{ByteStorage, StoragePool};

/// ByteRegion owns a fixed-length block of bytes.
///
/// Cloning a region returns another handle to the same bytes, this
/// is how views share the region they are constructed over.
/// The bytes stay alive as long as any handle or view does.
#[derive(Debug, Clone)]
pub struct ByteRegion {
    storage: ByteStorage,
}

impl ByteRegion {
    /// Create a zero-filled region from the default storage pool.
    ///
    /// Fails if `byte_length` exceeds the allocation limit.
    #[inline]
    pub fn new(byte_length: usize) -> Result<Self> {
        let storage = ByteStorage::allocate(byte_length)?;
        Ok(ByteRegion { storage })
    }

    /// Create a zero-filled region from given storage pool.
    #[inline]
    pub fn new_in(pool: &StoragePool, byte_length: usize) -> Result<Self> {
        let storage = pool.allocate(byte_length)?;
        Ok(ByteRegion { storage })
    }

    /// Create a zero-filled region with length coerced from arbitrary number.
    /// Absent length creates an empty region.
    #[inline]
    pub fn with_length<T: ToInt>(byte_length: Option<T>) -> Result<Self> {
        let byte_length = positive_int(byte_length, "Length", Some(0))?;
        ByteRegion::new(byte_length)
    }

    /// Wrap existing storage without copy.
    #[inline]
    pub fn from_external(storage: ByteStorage) -> Self {
        ByteRegion { storage }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn storage(&self) -> &ByteStorage {
        &self.storage
    }

    /// Returns whether two handles refer to the same region.
    #[inline]
    pub fn same_region(&self, other: &ByteRegion) -> bool {
        self.storage.same_allocation(&other.storage)
            && self.storage.underlying_offset() == other.storage.underlying_offset()
            && self.storage.len() == other.storage.len()
    }

    /// Copy region bytes out to a new vector.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.to_vec()
    }

    /// Copy bytes `[begin, end)` into a new, independently owned region.
    ///
    /// Negative offsets count backward from the end. Absent `begin` is 0
    /// and absent `end` is the byte length. An empty or inverted range
    /// results in an empty region.
    pub fn slice(&self, begin: Option<i64>, end: Option<i64>) -> Result<ByteRegion> {
        let len = self.byte_length();
        let begin = abs_offset(begin, len, Some(0));
        let end = abs_offset(end, len, None);
        if begin >= end {
            return ByteRegion::new(0);
        }
        let region = ByteRegion::new(end - begin)?;
        self.storage.copy_range(begin, end, &region.storage, 0)?;
        Ok(region)
    }
}

impl From<ByteStorage> for ByteRegion {
    #[inline]
    fn from(storage: ByteStorage) -> Self {
        ByteRegion::from_external(storage)
    }
}
