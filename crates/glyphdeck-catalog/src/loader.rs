use std::sync::Arc;

use glyphdeck_core::formats::parse_chunk;
use glyphdeck_core::{
    CatalogError, ChunkCache, ChunkRecord, CollectionDescriptor, Icon, MetadataRecord,
};

use crate::client::SourceClient;

/// Where a chunk's icons came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOrigin {
    Cache,
    Network,
    /// Fetch or parse failed; the chunk counts as empty.
    Failed,
}

#[derive(Debug, Clone)]
pub struct LoadedChunk {
    pub index: usize,
    pub origin: ChunkOrigin,
    pub icons: Vec<Icon>,
}

/// Loads chunks of a lazy collection: cache first, then the content source.
/// Fetched chunks are normalized and written back to the cache.
pub struct ChunkLoader<C: SourceClient> {
    client: Arc<C>,
}

impl<C: SourceClient> ChunkLoader<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Load a single chunk. Never fails: an unavailable chunk is empty.
    pub async fn load_chunk<K: ChunkCache>(
        &self,
        descriptor: &CollectionDescriptor,
        metadata: &MetadataRecord,
        cache: &K,
        index: usize,
    ) -> LoadedChunk {
        let key = index as u32;

        match cache.get_chunk(key) {
            Ok(Some(chunk)) => {
                tracing::debug!("Chunk {} of {} served from cache", index, descriptor.id);
                return LoadedChunk {
                    index,
                    origin: ChunkOrigin::Cache,
                    icons: chunk.icons,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Chunk cache read failed for {} #{}: {}", descriptor.id, index, e);
            }
        }

        match self.fetch_chunk(descriptor, metadata, index).await {
            Ok(icons) => {
                let record = ChunkRecord::new(key, icons);
                if let Err(e) = cache.put_chunk(&record) {
                    tracing::warn!("Failed to cache chunk {} of {}: {}", index, descriptor.id, e);
                }
                tracing::info!(
                    "Parsed chunk {} of {}: {} icons",
                    index,
                    descriptor.id,
                    record.icons.len()
                );
                LoadedChunk {
                    index,
                    origin: ChunkOrigin::Network,
                    icons: record.icons,
                }
            }
            Err(e) => {
                // One bad chunk leaves a gap in the page, it does not fail the range
                tracing::warn!("{}", e);
                LoadedChunk {
                    index,
                    origin: ChunkOrigin::Failed,
                    icons: Vec::new(),
                }
            }
        }
    }

    async fn fetch_chunk(
        &self,
        descriptor: &CollectionDescriptor,
        metadata: &MetadataRecord,
        index: usize,
    ) -> Result<Vec<Icon>, CatalogError> {
        let unavailable = |reason: String| CatalogError::ChunkUnavailable {
            collection: descriptor.id.clone(),
            index,
            reason,
        };

        let path = descriptor
            .chunk_path(index, metadata.chunk_file(index))
            .ok_or_else(|| unavailable("no chunk pattern or chunk file".to_string()))?;

        let document = self
            .client
            .fetch_json(&path)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let prefix = descriptor.class_prefix_or(metadata.prefix.as_deref());
        let outcome = parse_chunk(prefix, document).map_err(|e| unavailable(e.to_string()))?;
        if outcome.defaulted > 0 {
            tracing::warn!(
                "Chunk {} of {}: {} records without a name",
                index,
                descriptor.id,
                outcome.defaulted
            );
        }

        Ok(outcome.icons)
    }

    /// Icons at absolute positions `[start, end)`, in order.
    ///
    /// Chunk `i` is placed at offset `i * chunk_size` and only its overlap
    /// with the window is kept. This is not the same as concatenating the
    /// loaded chunks and slicing from the first chunk's offset: the two agree
    /// while every chunk loads, but when a chunk fails here its positions are
    /// simply missing and later icons keep their places.
    pub async fn load_range<K: ChunkCache>(
        &self,
        descriptor: &CollectionDescriptor,
        metadata: &MetadataRecord,
        cache: &K,
        start: usize,
        end: usize,
    ) -> Vec<Icon> {
        let end = end.min(metadata.total());
        let Some(span) = metadata.chunk_span(start, end) else {
            return Vec::new();
        };

        let chunk_size = metadata.chunk_size();
        let mut icons = Vec::new();

        for index in span {
            let chunk = self.load_chunk(descriptor, metadata, cache, index).await;

            let base = index.saturating_mul(chunk_size);
            let from = start.saturating_sub(base).min(chunk.icons.len());
            let to = end.saturating_sub(base).min(chunk.icons.len());
            if from < to {
                icons.extend(chunk.icons.into_iter().skip(from).take(to - from));
            }
        }

        icons
    }
}
