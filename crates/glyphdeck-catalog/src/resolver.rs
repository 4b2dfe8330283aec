use std::sync::Arc;

use glyphdeck_core::{
    CatalogError, ChunkCache, CollectionDescriptor, MetadataRecord, ValidationError,
};

use crate::client::SourceClient;

/// Resolves a lazy collection's chunk manifest, cache first.
pub struct MetadataResolver<C: SourceClient> {
    client: Arc<C>,
}

impl<C: SourceClient> MetadataResolver<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn resolve<K: ChunkCache>(
        &self,
        descriptor: &CollectionDescriptor,
        cache: &K,
    ) -> Result<MetadataRecord, CatalogError> {
        let unavailable = |reason: String| CatalogError::MetadataUnavailable {
            collection: descriptor.id.clone(),
            reason,
        };

        match cache.get_metadata() {
            Ok(Some(metadata)) => {
                tracing::debug!("Metadata for {} served from cache", descriptor.id);
                return Ok(metadata);
            }
            Ok(None) => {}
            Err(e) => {
                // Unreadable cache behaves like an empty one
                tracing::warn!("Metadata cache read failed for {}: {}", descriptor.id, e);
            }
        }

        let path = descriptor.metadata.as_deref().ok_or_else(|| {
            unavailable(ValidationError::MissingPath(descriptor.id.clone(), "metadata path").to_string())
        })?;

        let payload = self
            .client
            .fetch_json(path)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let metadata = MetadataRecord::from_value(payload).map_err(|e| unavailable(e.to_string()))?;

        if let Err(e) = cache.put_metadata(&metadata) {
            tracing::warn!("Failed to cache metadata for {}: {}", descriptor.id, e);
        } else {
            tracing::info!(
                "Cached metadata for {}: {} icons in {} chunks",
                descriptor.id,
                metadata.total_icons,
                metadata.number_of_chunks()
            );
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lazy_descriptor, lazy_source, MockSourceClient, METADATA_PATH};
    use glyphdeck_core::InMemoryChunkCache;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetches_then_caches() {
        let client = Arc::new(lazy_source(1250, 500));
        let cache = InMemoryChunkCache::new();
        let resolver = MetadataResolver::new(client.clone());

        let first = resolver.resolve(&lazy_descriptor(), &cache).await.unwrap();
        assert_eq!(first.total_icons, 1250);
        assert_eq!(first.number_of_chunks(), 3);
        assert_eq!(client.fetches(), 1);

        let second = resolver.resolve(&lazy_descriptor(), &cache).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(client.fetches(), 1);
    }

    #[tokio::test]
    async fn test_rejects_payload_without_total() {
        let client = Arc::new(MockSourceClient::new());
        client.add(METADATA_PATH, json!({"chunk_size": 500}));
        let cache = InMemoryChunkCache::new();

        let err = MetadataResolver::new(client)
            .resolve(&lazy_descriptor(), &cache)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::MetadataUnavailable { .. }));
        assert!(cache.get_metadata().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_metadata() {
        let client = Arc::new(MockSourceClient::new());
        let cache = InMemoryChunkCache::new();

        let err = MetadataResolver::new(client)
            .resolve(&lazy_descriptor(), &cache)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::MetadataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_metadata_path() {
        let client = Arc::new(MockSourceClient::new());
        let cache = InMemoryChunkCache::new();
        let mut descriptor = lazy_descriptor();
        descriptor.metadata = None;

        let err = MetadataResolver::new(client.clone())
            .resolve(&descriptor, &cache)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::MetadataUnavailable { .. }));
        assert_eq!(client.fetches(), 0);
    }
}
