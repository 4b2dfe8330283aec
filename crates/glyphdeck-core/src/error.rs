use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Collection manifest unavailable: {0}")]
    ManifestUnavailable(String),

    #[error("Metadata unavailable for {collection}: {reason}")]
    MetadataUnavailable { collection: String, reason: String },

    #[error("Chunk {index} unavailable for {collection}: {reason}")]
    ChunkUnavailable {
        collection: String,
        index: usize,
        reason: String,
    },

    #[error("Icon data unavailable for {collection}: {reason}")]
    SourceUnavailable { collection: String, reason: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Cache error: {0}")]
    Cache(#[from] StorageError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Metadata is missing total_icons")]
    MissingTotalIcons,

    #[error("Invalid chunk_size {0}: must be a positive integer")]
    InvalidChunkSize(u64),

    #[error("Document has no icons array")]
    MissingIconList,

    #[error("Unexpected document shape: {0}")]
    UnexpectedShape(String),

    #[error("Collection {0} has no {1} configured")]
    MissingPath(String, &'static str),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Source unreachable: {0}")]
    Unavailable(String),

    #[error("Source answered with status {0}")]
    Status(u16),

    #[error("Invalid JSON: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
}
