//! Raw byte storage backing typed array views.
//!
//! Storage is allocated either as a dedicated aligned block, or carved
//! out of a shared slab owned by a [`StoragePool`]. A [`ByteStorage`]
//! handle is a window into one of those allocations; cloning or slicing
//! the handle never copies bytes.
pub mod alloc;
pub mod config;
pub mod error;
pub mod pool;
pub mod repr;
pub mod storage;

pub use config::StorageConfig;
pub use error::{Error, Result};
pub use pool::{default_pool, StoragePool};
pub use repr::{ByteRepr, Endian};
pub use storage::ByteStorage;
