use crate::alloc::{align_up, RawArray};
use crate::config::StorageConfig;
use crate::error::Result;
use crate::storage::{Arena, ByteStorage};
use parking_lot::{Mutex, RwLock};
use static_init::dynamic;
use std::sync::Arc;

#[dynamic]
static DEFAULT_POOL: StoragePool = StoragePool::with_default_config();

/// Returns the process-wide storage pool with default configuration.
#[inline]
pub fn default_pool() -> &'static StoragePool {
    &DEFAULT_POOL
}

/// StoragePool hands out zero-filled byte storage.
///
/// Small requests are carved out of the current slab, so many
/// storage handles may share one allocation at different offsets.
/// Requests above the pooling threshold get a dedicated block.
/// Once a slab cannot satisfy a request, a new slab replaces it;
/// the old slab lives on as long as any storage carved from it.
#[derive(Debug)]
pub struct StoragePool {
    config: StorageConfig,
    slab: Mutex<Option<Slab>>,
}

#[derive(Debug)]
struct Slab {
    arena: Arena,
    cap: usize,
    used: usize,
}

impl Slab {
    #[inline]
    fn new(cap: usize) -> Result<Self> {
        Ok(Slab {
            arena: Arc::new(RwLock::new(RawArray::zeroed(cap)?)),
            cap,
            used: 0,
        })
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.cap - self.used
    }

    #[inline]
    fn carve(&mut self, len: usize, align: usize) -> ByteStorage {
        let offset = self.used;
        self.used = align_up(offset + len, align).map_or(self.cap, |n| n.min(self.cap));
        ByteStorage::carved(Arc::clone(&self.arena), offset, len)
    }
}

impl StoragePool {
    /// Create a pool with given configuration.
    #[inline]
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;
        Ok(StoragePool {
            config,
            slab: Mutex::new(None),
        })
    }

    #[inline]
    pub fn with_default_config() -> Self {
        StoragePool {
            config: StorageConfig::default(),
            slab: Mutex::new(None),
        }
    }

    #[inline]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Allocate zero-filled storage of given length.
    ///
    /// Fails if length exceeds the allocation limit.
    pub fn allocate(&self, len: usize) -> Result<ByteStorage> {
        if !self.config.pooled() || len > self.config.pooling_threshold() {
            log::debug!("allocate dedicated storage of {} bytes", len);
            return ByteStorage::dedicated(len);
        }
        let mut slab = self.slab.lock();
        if slab.as_ref().map_or(true, |s| s.remaining() < len) {
            log::debug!("open new storage slab of {} bytes", self.config.pool_size);
            *slab = Some(Slab::new(self.config.pool_size)?);
        }
        match slab.as_mut() {
            Some(s) => Ok(s.carve(len, self.config.pool_align)),
            None => ByteStorage::dedicated(len),
        }
    }
}
