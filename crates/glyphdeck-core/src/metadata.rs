use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// One entry of an explicit chunk list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkEntry {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Chunk manifest for a lazily loaded collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub total_icons: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<ChunkEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl MetadataRecord {
    pub fn new(total_icons: u64, chunk_size: Option<u64>) -> Self {
        Self {
            total_icons,
            chunk_size,
            chunks: None,
            prefix: None,
        }
    }

    /// Validate a fetched payload. It must be an object with a numeric
    /// `total_icons`; unknown fields are ignored.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;
        if !obj.get("total_icons").is_some_and(Value::is_u64) {
            return Err(ValidationError::MissingTotalIcons);
        }

        let record: MetadataRecord = serde_json::from_value(value)
            .map_err(|e| ValidationError::UnexpectedShape(e.to_string()))?;

        if record.chunk_size == Some(0) {
            return Err(ValidationError::InvalidChunkSize(0));
        }
        Ok(record)
    }

    pub fn total(&self) -> usize {
        self.total_icons as usize
    }

    pub fn chunk_size(&self) -> usize {
        match self.chunk_size {
            Some(size) if size > 0 => size as usize,
            _ => DEFAULT_CHUNK_SIZE,
        }
    }

    /// Explicit chunk list length when present, otherwise `ceil(total / chunk_size)`.
    pub fn number_of_chunks(&self) -> usize {
        match &self.chunks {
            Some(chunks) if !chunks.is_empty() => chunks.len(),
            _ => self.total().div_ceil(self.chunk_size()),
        }
    }

    /// Chunk indices covering `[start, end)`, or `None` for an empty window.
    /// Never reaches past the last chunk.
    pub fn chunk_span(&self, start: usize, end: usize) -> Option<RangeInclusive<usize>> {
        let chunks = self.number_of_chunks();
        if start >= end || chunks == 0 {
            return None;
        }
        let size = self.chunk_size();
        let first = start / size;
        let last = ((end - 1) / size).min(chunks - 1);
        if first > last {
            return None;
        }
        Some(first..=last)
    }

    pub fn chunk_file(&self, index: usize) -> Option<&str> {
        self.chunks
            .as_ref()
            .and_then(|c| c.get(index))
            .and_then(|entry| entry.file.as_deref())
    }
}
