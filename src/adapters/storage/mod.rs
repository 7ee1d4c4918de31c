//! Cache storage adapters.
//!
//! - `InMemoryCacheStorage` - Process-lifetime storage for tests and embedded hosts
//! - `FileCacheStorage` - One file per key, survives restarts

mod file_cache_storage;
mod in_memory_cache_storage;

pub use file_cache_storage::FileCacheStorage;
pub use in_memory_cache_storage::InMemoryCacheStorage;
