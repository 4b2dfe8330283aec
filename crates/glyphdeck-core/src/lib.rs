//! Glyphdeck Core - Domain models, source formats and cache traits.
//!
//! This crate contains the icon catalog's domain logic. It performs no I/O
//! and has no dependencies on other Glyphdeck crates.

pub mod chunk;
pub mod collection;
pub mod error;
pub mod formats;
pub mod icon;
pub mod metadata;
pub mod paging;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use chunk::ChunkRecord;
pub use collection::{CollectionDescriptor, FaStyle, Manifest, ProcessorKind, Resolved};
pub use error::{CatalogError, FetchError, StorageError, ValidationError};
pub use formats::ParseOutcome;
pub use icon::{filter_icons, Icon};
pub use metadata::{ChunkEntry, MetadataRecord};
pub use paging::ICONS_PER_PAGE;
pub use storage::{CacheRegistry, ChunkCache};
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::{InMemoryCacheRegistry, InMemoryChunkCache};
