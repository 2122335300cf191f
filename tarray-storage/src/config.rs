use crate::alloc::ALIGNMENT;
use crate::error::{Error, Result};

/// Default slab size of storage pool, 8KB.
pub const DEFAULT_POOL_SIZE: usize = 8 * 1024;
/// Default alignment of storage carved out of a slab.
pub const DEFAULT_POOL_ALIGN: usize = 8;

/// Configuration of storage pool.
///
/// Small allocations are carved out of a shared slab of `pool_size`
/// bytes. Each carve starts at a multiple of `pool_align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageConfig {
    pub pool_size: usize,
    pub pool_align: usize,
}

impl Default for StorageConfig {
    #[inline]
    fn default() -> Self {
        StorageConfig {
            pool_size: DEFAULT_POOL_SIZE,
            pool_align: DEFAULT_POOL_ALIGN,
        }
    }
}

impl StorageConfig {
    /// Configuration which disables pooling, every allocation
    /// owns a dedicated block.
    #[inline]
    pub fn unpooled() -> Self {
        StorageConfig {
            pool_size: 0,
            ..Default::default()
        }
    }

    #[inline]
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    #[inline]
    pub fn pool_align(mut self, pool_align: usize) -> Self {
        self.pool_align = pool_align;
        self
    }

    /// Returns whether allocations are carved out of slabs.
    #[inline]
    pub fn pooled(&self) -> bool {
        self.pool_size > 0
    }

    /// Allocations larger than this threshold bypass the slab.
    #[inline]
    pub fn pooling_threshold(&self) -> usize {
        self.pool_size >> 1
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pool_align.is_power_of_two() {
            return Err(Error::InvalidArgument(
                "pool alignment must be a power of two",
            ));
        }
        if self.pool_align > ALIGNMENT {
            return Err(Error::InvalidArgument(
                "pool alignment must not exceed 16 bytes",
            ));
        }
        Ok(())
    }
}
