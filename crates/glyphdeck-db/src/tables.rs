use redb::TableDefinition;

/// Table holding the collection's chunk manifest.
/// Key: always [`METADATA_KEY`]
/// Value: serialized MetadataRecord as bytes
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Table holding normalized chunks.
/// Key: chunk index
/// Value: serialized ChunkRecord as bytes
pub const CHUNKS_TABLE: TableDefinition<u32, &[u8]> = TableDefinition::new("chunks");

/// The single key of the metadata table.
pub const METADATA_KEY: &str = "metadata";

/// File extension of per-collection cache files.
pub const STORE_EXTENSION: &str = "redb";
