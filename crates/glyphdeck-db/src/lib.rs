//! Glyphdeck DB - redb implementation of the chunk cache.

pub mod chunk_store;
pub mod registry;
pub mod tables;

pub use chunk_store::RedbChunkCache;
pub use registry::RedbCacheRegistry;

use std::path::Path;

use glyphdeck_core::StorageError;

/// Open the cache registry rooted at `dir`, creating the directory if needed.
pub fn init_cache(dir: impl AsRef<Path>) -> Result<RedbCacheRegistry, StorageError> {
    RedbCacheRegistry::new(dir.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphdeck_core::CacheRegistry;
    use tempfile::tempdir;

    #[test]
    fn test_init_cache_creates_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("cache");

        let registry = init_cache(&root).unwrap();
        assert!(root.is_dir());

        // Verify we can open a store
        let _store = registry.open("lawnicons").unwrap();
    }
}
