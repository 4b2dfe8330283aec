use serde::{Deserialize, Serialize};

use crate::icon::Icon;

/// A normalized chunk as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub chunk_index: u32,
    pub icons: Vec<Icon>,
}

impl ChunkRecord {
    pub fn new(chunk_index: u32, icons: Vec<Icon>) -> Self {
        Self { chunk_index, icons }
    }
}
