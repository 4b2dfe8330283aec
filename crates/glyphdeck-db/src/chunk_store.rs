use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable};

use glyphdeck_core::{ChunkCache, ChunkRecord, MetadataRecord, StorageError};

use crate::tables::{CHUNKS_TABLE, METADATA_KEY, METADATA_TABLE};

/// redb implementation of ChunkCache. One database file per collection.
pub struct RedbChunkCache {
    db: Arc<Database>,
}

impl RedbChunkCache {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create or open the database at `path` with both tables in place.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::init_tables(&db)?;
        Ok(Self::new(Arc::new(db)))
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            // Create tables if they don't exist
            let _ = write_txn
                .open_table(METADATA_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;
            let _ = write_txn
                .open_table(CHUNKS_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }

    /// Indices of every cached chunk, ascending.
    #[cfg(test)]
    pub fn cached_chunks(&self) -> Result<Vec<u32>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(CHUNKS_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let mut indices = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| StorageError::Database(e.to_string()))?
        {
            let (key, _) = entry.map_err(|e| StorageError::Database(e.to_string()))?;
            indices.push(key.value());
        }

        Ok(indices)
    }
}

impl ChunkCache for RedbChunkCache {
    fn get_metadata(&self) -> Result<Option<MetadataRecord>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(METADATA_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        match table
            .get(METADATA_KEY)
            .map_err(|e| StorageError::Database(e.to_string()))?
        {
            Some(value) => {
                let metadata: MetadataRecord = serde_json::from_slice(value.value())
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                Ok(Some(metadata))
            }
            None => Ok(None),
        }
    }

    fn put_metadata(&self, metadata: &MetadataRecord) -> Result<(), StorageError> {
        let value =
            serde_json::to_vec(metadata).map_err(|e| StorageError::Database(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        {
            let mut table = write_txn
                .open_table(METADATA_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            table
                .insert(METADATA_KEY, value.as_slice())
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_chunk(&self, index: u32) -> Result<Option<ChunkRecord>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(CHUNKS_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        match table
            .get(index)
            .map_err(|e| StorageError::Database(e.to_string()))?
        {
            Some(value) => {
                let chunk: ChunkRecord = serde_json::from_slice(value.value())
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                Ok(Some(chunk))
            }
            None => Ok(None),
        }
    }

    fn put_chunk(&self, chunk: &ChunkRecord) -> Result<(), StorageError> {
        let value = serde_json::to_vec(chunk).map_err(|e| StorageError::Database(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        {
            let mut table = write_txn
                .open_table(CHUNKS_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            // Same index, same content: overwriting is harmless
            table
                .insert(chunk.chunk_index, value.as_slice())
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }
}
