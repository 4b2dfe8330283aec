use glyphdeck_core::{ChunkCache, CollectionDescriptor, Icon, MetadataRecord};

use crate::client::SourceClient;
use crate::loader::{ChunkLoader, ChunkOrigin};

/// Statistics from a full materialization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeStats {
    pub from_cache: usize,
    pub fetched: usize,
    pub failed: usize,
}

/// Builds the complete icon list of a lazy collection by walking every chunk.
pub struct CollectionMaterializer;

impl CollectionMaterializer {
    /// Walk chunks `0..number_of_chunks` in order. Fetched chunks are cached
    /// by the loader, so repeating the walk is served entirely from cache.
    pub async fn materialize_all<C: SourceClient, K: ChunkCache>(
        loader: &ChunkLoader<C>,
        descriptor: &CollectionDescriptor,
        metadata: &MetadataRecord,
        cache: &K,
    ) -> (Vec<Icon>, MaterializeStats) {
        let mut stats = MaterializeStats::default();
        // Grown per chunk; `total_icons` comes from the source and is not trusted
        let mut icons = Vec::new();

        for index in 0..metadata.number_of_chunks() {
            let chunk = loader.load_chunk(descriptor, metadata, cache, index).await;
            match chunk.origin {
                ChunkOrigin::Cache => stats.from_cache += 1,
                ChunkOrigin::Network => stats.fetched += 1,
                ChunkOrigin::Failed => stats.failed += 1,
            }
            icons.extend(chunk.icons);
        }

        tracing::info!(
            "Materialized {} icons of {} ({} cached, {} fetched, {} failed chunks)",
            icons.len(),
            descriptor.id,
            stats.from_cache,
            stats.fetched,
            stats.failed
        );

        (icons, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chunk_path, icon_name, lazy_descriptor, lazy_source, MockSourceClient};
    use glyphdeck_core::InMemoryChunkCache;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_materialize_twice_is_identical_and_cached() {
        let client = Arc::new(lazy_source(1250, 500));
        let cache = InMemoryChunkCache::new();
        let loader = ChunkLoader::new(client.clone());
        let meta = MetadataRecord::new(1250, Some(500));

        let (first, stats) =
            CollectionMaterializer::materialize_all(&loader, &lazy_descriptor(), &meta, &cache)
                .await;
        assert_eq!(first.len(), 1250);
        assert_eq!(stats.fetched, 3);
        let fetches_after_first = client.fetches();

        let (second, stats) =
            CollectionMaterializer::materialize_all(&loader, &lazy_descriptor(), &meta, &cache)
                .await;
        assert_eq!(second, first);
        assert_eq!(stats.from_cache, 3);
        assert_eq!(client.fetches(), fetches_after_first);
    }

    #[tokio::test]
    async fn test_materialize_order_and_range_agree() {
        let client = Arc::new(lazy_source(1250, 500));
        let cache = InMemoryChunkCache::new();
        let loader = ChunkLoader::new(client);
        let meta = MetadataRecord::new(1250, Some(500));

        let (all, _) =
            CollectionMaterializer::materialize_all(&loader, &lazy_descriptor(), &meta, &cache)
                .await;
        let window = loader
            .load_range(&lazy_descriptor(), &meta, &cache, 480, 720)
            .await;

        assert_eq!(window, all[480..720].to_vec());
        assert_eq!(all[1249].name, icon_name(1249));
    }

    #[tokio::test]
    async fn test_materialize_skips_failed_chunk() {
        let client = Arc::new(lazy_source(50, 10));
        client.fail(&chunk_path(2));
        let cache = InMemoryChunkCache::new();
        let loader = ChunkLoader::new(client);
        let meta = MetadataRecord::new(50, Some(10));

        let (icons, stats) =
            CollectionMaterializer::materialize_all(&loader, &lazy_descriptor(), &meta, &cache)
                .await;

        assert_eq!(icons.len(), 40);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.fetched, 4);
    }

    #[tokio::test]
    async fn test_oversized_total_does_not_preallocate() {
        for total in [100_000_000_000u64, u64::MAX] {
            let client = Arc::new(MockSourceClient::new());
            client.add(
                &chunk_path(0),
                json!({"icons": [{"properties": {"name": "only"}}]}),
            );
            let cache = InMemoryChunkCache::new();
            let loader = ChunkLoader::new(client);
            let meta = MetadataRecord::from_value(json!({"total_icons": total, "chunk_size": total}))
                .unwrap();
            assert_eq!(meta.number_of_chunks(), 1);

            let (icons, stats) =
                CollectionMaterializer::materialize_all(&loader, &lazy_descriptor(), &meta, &cache)
                    .await;

            assert_eq!(icons.len(), 1);
            assert_eq!(icons[0].name, "only");
            assert_eq!(stats.fetched, 1);
        }
    }
}
