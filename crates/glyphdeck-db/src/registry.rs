use std::path::PathBuf;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use glyphdeck_core::{CacheRegistry, StorageError, Validator};

use crate::chunk_store::RedbChunkCache;
use crate::tables::STORE_EXTENSION;

/// Per-collection redb stores under one directory, opened on first use.
///
/// The store is created while the map entry is held, so concurrent first
/// calls for the same collection wait for a single `Database::create`.
pub struct RedbCacheRegistry {
    dir: PathBuf,
    stores: DashMap<String, Arc<RedbChunkCache>>,
}

impl RedbCacheRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(Self {
            dir,
            stores: DashMap::new(),
        })
    }

    pub fn store_path(&self, collection_id: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            Validator::store_name(collection_id),
            STORE_EXTENSION
        ))
    }

    /// Number of stores opened so far.
    pub fn open_stores(&self) -> usize {
        self.stores.len()
    }
}

impl CacheRegistry for RedbCacheRegistry {
    type Cache = RedbChunkCache;

    fn open(&self, collection_id: &str) -> Result<Arc<RedbChunkCache>, StorageError> {
        Validator::validate_collection_id(collection_id)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        match self.stores.entry(collection_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let path = self.store_path(collection_id);
                let cache = Arc::new(RedbChunkCache::create(&path)?);
                tracing::debug!("Opened cache store {}", path.display());
                Ok(entry.insert(cache).value().clone())
            }
        }
    }
}
