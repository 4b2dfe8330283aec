use futures::future::try_join_all;

use glyphdeck_core::formats::parse_collection;
use glyphdeck_core::{CatalogError, CollectionDescriptor, Icon, Manifest, ValidationError};

use crate::client::SourceClient;

/// Fetch and parse the collection manifest.
pub async fn load_manifest<C: SourceClient>(
    client: &C,
    path: &str,
) -> Result<Manifest, CatalogError> {
    let document = client
        .fetch_json(path)
        .await
        .map_err(|e| CatalogError::ManifestUnavailable(format!("{}: {}", path, e)))?;

    let manifest = Manifest::from_value(document)
        .map_err(|e| CatalogError::ManifestUnavailable(format!("{}: {}", path, e)))?;

    if manifest.is_empty() {
        return Err(CatalogError::ManifestUnavailable(format!(
            "{}: no collections",
            path
        )));
    }
    Ok(manifest)
}

/// Fetch every source document of a materialized collection and parse it
/// with the configured processor.
pub async fn load_full_collection<C: SourceClient>(
    client: &C,
    descriptor: &CollectionDescriptor,
) -> Result<Vec<Icon>, CatalogError> {
    let unavailable = |reason: String| CatalogError::SourceUnavailable {
        collection: descriptor.id.clone(),
        reason,
    };

    let kind = descriptor
        .processor
        .ok_or_else(|| unavailable("no processorType configured".to_string()))?;

    if descriptor.sources.is_empty() {
        return Err(unavailable(
            ValidationError::MissingPath(descriptor.id.clone(), "json source").to_string(),
        ));
    }

    let documents = try_join_all(descriptor.sources.iter().map(|path| client.fetch_json(path)))
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let outcome =
        parse_collection(descriptor, kind, documents).map_err(|e| unavailable(e.to_string()))?;

    if outcome.defaulted > 0 {
        tracing::warn!(
            "{}: {} records without a name",
            descriptor.id,
            outcome.defaulted
        );
    }
    tracing::info!("Loaded {} icons for {}", outcome.icons.len(), descriptor.id);

    Ok(outcome.icons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSourceClient;
    use glyphdeck_core::ProcessorKind;
    use serde_json::json;

    fn batch_descriptor() -> CollectionDescriptor {
        let mut d = CollectionDescriptor::new("feather", "Feather");
        d.processor = Some(ProcessorKind::IcoMoonBatch);
        d.sources = vec!["data/a.json".to_string(), "data/b.json".to_string()];
        d.class_prefix = Some("fe-".to_string());
        d
    }

    #[tokio::test]
    async fn test_manifest_loads() {
        let client = MockSourceClient::new();
        client.add(
            "data/collections-database.json",
            json!({"lawnicons": {"title": "Lawnicons", "family": "lawnicons"}}),
        );

        let manifest = load_manifest(&client, "data/collections-database.json")
            .await
            .unwrap();
        assert_eq!(manifest.collections()[0].id, "lawnicons");
    }

    #[tokio::test]
    async fn test_manifest_unavailable() {
        let client = MockSourceClient::new();
        assert!(matches!(
            load_manifest(&client, "missing.json").await,
            Err(CatalogError::ManifestUnavailable(_))
        ));

        client.add("empty.json", json!([]));
        assert!(matches!(
            load_manifest(&client, "empty.json").await,
            Err(CatalogError::ManifestUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_sources_concatenate_in_order() {
        let client = MockSourceClient::new();
        client.add("data/a.json", json!({"icons": [{"properties": {"name": "one"}}]}));
        client.add(
            "data/b.json",
            json!({"icons": [{"properties": {"name": "two"}}, {"properties": {"name": "three"}}]}),
        );

        let icons = load_full_collection(&client, &batch_descriptor()).await.unwrap();
        let names: Vec<_> = icons.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert_eq!(icons[0].html_code, "<i class=\"fe-one\"></i>");
    }

    #[tokio::test]
    async fn test_any_missing_source_fails_collection() {
        let client = MockSourceClient::new();
        client.add("data/a.json", json!({"icons": []}));

        assert!(matches!(
            load_full_collection(&client, &batch_descriptor()).await,
            Err(CatalogError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_processor_required() {
        let client = MockSourceClient::new();
        let mut descriptor = batch_descriptor();
        descriptor.processor = None;

        assert!(load_full_collection(&client, &descriptor).await.is_err());
        assert_eq!(client.fetches(), 0);
    }
}
