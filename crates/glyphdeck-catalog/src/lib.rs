//! Glyphdeck catalog - content sources, lazy chunk loading and the pager.

pub mod browser;
pub mod client;
pub mod loader;
pub mod materializer;
pub mod resolver;
pub mod source;

#[cfg(test)]
mod test_support;

pub use browser::{Browser, PageView, ViewState};
pub use client::{FsSourceClient, HttpSourceClient, SourceBackend, SourceClient};
pub use loader::{ChunkLoader, ChunkOrigin, LoadedChunk};
pub use materializer::{CollectionMaterializer, MaterializeStats};
pub use resolver::MetadataResolver;
pub use source::{load_full_collection, load_manifest};
