use std::sync::Arc;

use crate::chunk::ChunkRecord;
use crate::error::StorageError;
use crate::metadata::MetadataRecord;

/// Read-through cache for one collection: a singleton `metadata` record
/// and `chunks` keyed by chunk index. Nothing is ever evicted.
pub trait ChunkCache: Send + Sync {
    fn get_metadata(&self) -> Result<Option<MetadataRecord>, StorageError>;

    fn put_metadata(&self, metadata: &MetadataRecord) -> Result<(), StorageError>;

    fn get_chunk(&self, index: u32) -> Result<Option<ChunkRecord>, StorageError>;

    /// Insert or overwrite the chunk at `chunk.chunk_index`.
    fn put_chunk(&self, chunk: &ChunkRecord) -> Result<(), StorageError>;
}

/// Hands out the cache of a collection, creating it on first use.
/// Concurrent first calls for the same id must yield the same store.
pub trait CacheRegistry: Send + Sync {
    type Cache: ChunkCache;

    fn open(&self, collection_id: &str) -> Result<Arc<Self::Cache>, StorageError>;
}

// In-memory implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, RwLock};

    /// In-memory chunk cache for testing.
    #[derive(Default)]
    pub struct InMemoryChunkCache {
        metadata: RwLock<Option<MetadataRecord>>,
        chunks: RwLock<HashMap<u32, ChunkRecord>>,
    }

    impl InMemoryChunkCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn chunk_count(&self) -> usize {
            self.chunks.read().unwrap().len()
        }
    }

    impl ChunkCache for InMemoryChunkCache {
        fn get_metadata(&self) -> Result<Option<MetadataRecord>, StorageError> {
            Ok(self.metadata.read().unwrap().clone())
        }

        fn put_metadata(&self, metadata: &MetadataRecord) -> Result<(), StorageError> {
            *self.metadata.write().unwrap() = Some(metadata.clone());
            Ok(())
        }

        fn get_chunk(&self, index: u32) -> Result<Option<ChunkRecord>, StorageError> {
            Ok(self.chunks.read().unwrap().get(&index).cloned())
        }

        fn put_chunk(&self, chunk: &ChunkRecord) -> Result<(), StorageError> {
            self.chunks
                .write()
                .unwrap()
                .insert(chunk.chunk_index, chunk.clone());
            Ok(())
        }
    }

    /// In-memory registry for testing.
    #[derive(Default)]
    pub struct InMemoryCacheRegistry {
        stores: Mutex<HashMap<String, Arc<InMemoryChunkCache>>>,
    }

    impl InMemoryCacheRegistry {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CacheRegistry for InMemoryCacheRegistry {
        type Cache = InMemoryChunkCache;

        fn open(&self, collection_id: &str) -> Result<Arc<InMemoryChunkCache>, StorageError> {
            let mut stores = self.stores.lock().unwrap();
            Ok(stores
                .entry(collection_id.to_string())
                .or_insert_with(|| Arc::new(InMemoryChunkCache::new()))
                .clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::icon::Icon;

        #[test]
        fn test_chunk_put_overwrites() {
            let cache = InMemoryChunkCache::new();

            cache
                .put_chunk(&ChunkRecord::new(0, vec![Icon::new("a", "<i></i>")]))
                .unwrap();
            cache
                .put_chunk(&ChunkRecord::new(0, vec![Icon::new("b", "<i></i>")]))
                .unwrap();

            let chunk = cache.get_chunk(0).unwrap().unwrap();
            assert_eq!(chunk.icons[0].name, "b");
            assert_eq!(cache.chunk_count(), 1);
            assert!(cache.get_chunk(1).unwrap().is_none());
        }

        #[test]
        fn test_registry_returns_same_store() {
            let registry = InMemoryCacheRegistry::new();

            let a = registry.open("lawnicons").unwrap();
            a.put_metadata(&MetadataRecord::new(10, None)).unwrap();

            let b = registry.open("lawnicons").unwrap();
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(b.get_metadata().unwrap().unwrap().total_icons, 10);

            let other = registry.open("simpleicons").unwrap();
            assert!(other.get_metadata().unwrap().is_none());
        }
    }
}
