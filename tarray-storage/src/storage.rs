use crate::alloc::RawArray;
use crate::error::{Error, Result};
use crate::pool::default_pool;
use crate::repr::{ByteRepr, Endian};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared allocation which one or more storage handles point into.
pub(crate) type Arena = Arc<RwLock<RawArray>>;

/// ByteStorage is a handle to a byte range of an allocation.
///
/// The allocation is either dedicated to this storage, or a slab
/// shared with other storage handed out by the same pool.
/// Cloning and slicing share the allocation, writes through any
/// handle are visible to every handle covering the same bytes.
///
/// Storage handed out by one pool may share an allocation, and with
/// it the allocation lock. Every access holds that lock for the
/// duration of the call only, never holds two locks at once, and
/// never runs caller code while holding it.
#[derive(Debug, Clone)]
pub struct ByteStorage {
    arena: Arena,
    offset: usize,
    len: usize,
    pooled: bool,
}

impl ByteStorage {
    /// Allocate zero-filled storage from the default pool.
    #[inline]
    pub fn allocate(len: usize) -> Result<Self> {
        default_pool().allocate(len)
    }

    /// Allocate storage with its own block.
    #[inline]
    pub fn dedicated(len: usize) -> Result<Self> {
        Ok(ByteStorage {
            arena: Arc::new(RwLock::new(RawArray::zeroed(len)?)),
            offset: 0,
            len,
            pooled: false,
        })
    }

    #[inline]
    pub(crate) fn carved(arena: Arena, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= arena.read().cap_u8());
        ByteStorage {
            arena,
            offset,
            len,
            pooled: true,
        }
    }

    /// Allocate storage from the default pool and copy given bytes into it.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let storage = Self::allocate(bytes.len())?;
        storage.with_bytes_mut(|b| b.copy_from_slice(bytes));
        Ok(storage)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether this storage is a window into a pooled slab.
    #[inline]
    pub fn is_pooled(&self) -> bool {
        self.pooled
    }

    /// Start offset of this storage within its allocation.
    #[inline]
    pub fn underlying_offset(&self) -> usize {
        self.offset
    }

    /// Length of this storage within its allocation.
    #[inline]
    pub fn underlying_length(&self) -> usize {
        self.len
    }

    /// Returns whether two storage handles point into the same allocation.
    /// Their byte ranges may or may not overlap.
    #[inline]
    pub fn same_allocation(&self, other: &ByteStorage) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena)
    }

    /// Create a new handle on bytes `[start, end)` of this storage.
    /// No byte is copied.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> Result<ByteStorage> {
        if start > end {
            return Err(Error::InvalidArgument("slice start is greater than end"));
        }
        self.check_range(start, end - start)?;
        Ok(ByteStorage {
            arena: Arc::clone(&self.arena),
            offset: self.offset + start,
            len: end - start,
            pooled: self.pooled,
        })
    }

    /// Run the closure with immutable bytes of this storage.
    /// The closure must not access any other storage.
    #[inline]
    pub(crate) fn with_bytes<R, F: FnOnce(&[u8]) -> R>(&self, f: F) -> R {
        let arena = self.arena.read();
        f(&arena.as_slice()[self.offset..self.offset + self.len])
    }

    /// Run the closure with mutable bytes of this storage.
    /// The closure must not access any other storage.
    #[inline]
    pub(crate) fn with_bytes_mut<R, F: FnOnce(&mut [u8]) -> R>(&self, f: F) -> R {
        let mut arena = self.arena.write();
        f(&mut arena.as_slice_mut()[self.offset..self.offset + self.len])
    }

    /// Copy bytes out to a new vector.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.with_bytes(|b| b.to_vec())
    }

    #[inline]
    pub fn fill(&self, byte: u8) {
        self.with_bytes_mut(|b| b.fill(byte))
    }

    /// Copy bytes starting at `offset` into `dst`, filling it entirely.
    #[inline]
    pub fn copy_to_slice(&self, offset: usize, dst: &mut [u8]) -> Result<()> {
        self.check_range(offset, dst.len())?;
        self.with_bytes(|b| dst.copy_from_slice(&b[offset..offset + dst.len()]));
        Ok(())
    }

    /// Copy all of `src` into this storage starting at `offset`.
    #[inline]
    pub fn copy_from_slice(&self, offset: usize, src: &[u8]) -> Result<()> {
        self.check_range(offset, src.len())?;
        self.with_bytes_mut(|b| b[offset..offset + src.len()].copy_from_slice(src));
        Ok(())
    }

    /// Copy bytes `[src_start, src_end)` of this storage to `dst`
    /// starting at `dst_start`.
    ///
    /// The result is correct even if both ranges overlap within one
    /// allocation, as if source bytes were read out entirely before
    /// any write.
    pub fn copy_range(
        &self,
        src_start: usize,
        src_end: usize,
        dst: &ByteStorage,
        dst_start: usize,
    ) -> Result<()> {
        if src_start > src_end {
            return Err(Error::InvalidArgument("copy start is greater than end"));
        }
        let n = src_end - src_start;
        self.check_range(src_start, n)?;
        dst.check_range(dst_start, n)?;
        if n == 0 {
            return Ok(());
        }
        let from = self.offset + src_start;
        let to = dst.offset + dst_start;
        if self.same_allocation(dst) {
            let mut arena = self.arena.write();
            arena.as_slice_mut().copy_within(from..from + n, to);
        } else {
            // release the source lock before locking target.
            let tmp: SmallVec<[u8; 64]> = {
                let arena = self.arena.read();
                SmallVec::from_slice(&arena.as_slice()[from..from + n])
            };
            let mut arena = dst.arena.write();
            arena.as_slice_mut()[to..to + n].copy_from_slice(&tmp);
        }
        Ok(())
    }

    /// Decode a value at given offset.
    #[inline]
    pub fn read<T: ByteRepr>(&self, offset: usize, endian: Endian) -> Result<T> {
        self.check_range(offset, T::WIDTH)?;
        Ok(self.with_bytes(|b| T::from_bytes(&b[offset..], endian)))
    }

    /// Encode a value at given offset.
    #[inline]
    pub fn write<T: ByteRepr>(&self, offset: usize, value: T, endian: Endian) -> Result<()> {
        self.check_range(offset, T::WIDTH)?;
        self.with_bytes_mut(|b| value.write_bytes(&mut b[offset..], endian));
        Ok(())
    }

    #[inline]
    fn check_range(&self, offset: usize, width: usize) -> Result<()> {
        match offset.checked_add(width) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::OutOfRange {
                offset,
                width,
                len: self.len,
            }),
        }
    }
}

impl TryFrom<&[u8]> for ByteStorage {
    type Error = Error;

    #[inline]
    fn try_from(src: &[u8]) -> Result<Self> {
        ByteStorage::from_slice(src)
    }
}
