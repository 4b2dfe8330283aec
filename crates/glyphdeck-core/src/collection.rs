use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Families that are always browsed chunk by chunk.
pub const LAZY_FAMILIES: &[&str] = &["lawnicons", "simpleicons"];

pub const DEFAULT_CLASS_PREFIX: &str = "icon-";

/// Parser used for a collection's source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessorKind {
    #[serde(rename = "fa-optimized")]
    FaOptimized,
    #[serde(rename = "icomoon")]
    IcoMoon,
    #[serde(rename = "icomoon-batch")]
    IcoMoonBatch,
}

/// FontAwesome class naming scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaStyle {
    /// `fas` / `far` / `fab`
    Old,
    /// `fa-solid` / `fa-regular` / `fa-brands`
    #[default]
    #[serde(other)]
    Modern,
}

/// One icon set as described by the site manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDescriptor {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub family: String,
    #[serde(default, rename = "processorType")]
    pub processor: Option<ProcessorKind>,
    /// Source documents for materialized collections.
    #[serde(default, rename = "json")]
    pub sources: Vec<String>,
    /// Metadata file path; its presence selects lazy mode.
    #[serde(default)]
    pub metadata: Option<String>,
    /// Chunk path with an `{index}` placeholder.
    #[serde(default)]
    pub chunk_pattern: Option<String>,
    #[serde(default)]
    pub class_prefix: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub download: Option<String>,
    #[serde(default)]
    pub cdn: Option<String>,
    #[serde(default, rename = "fa_style")]
    pub fa_style: FaStyle,
}

impl CollectionDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            family: String::new(),
            processor: None,
            sources: Vec::new(),
            metadata: None,
            chunk_pattern: None,
            class_prefix: None,
            version: None,
            css: None,
            download: None,
            cdn: None,
            fa_style: FaStyle::default(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.metadata.is_some() || LAZY_FAMILIES.contains(&self.family.as_str())
    }

    /// Class prefix for IcoMoon-style markup. The descriptor wins over
    /// whatever the data files declare.
    pub fn class_prefix_or<'a>(&'a self, declared: Option<&'a str>) -> &'a str {
        self.class_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(declared.filter(|p| !p.is_empty()))
            .unwrap_or(DEFAULT_CLASS_PREFIX)
    }

    /// Source path of chunk `index`. The pattern wins; an explicit chunk list
    /// entry is resolved against the metadata file's directory.
    pub fn chunk_path(&self, index: usize, listed_file: Option<&str>) -> Option<String> {
        if let Some(pattern) = &self.chunk_pattern {
            return Some(pattern.replace("{index}", &index.to_string()));
        }
        let file = listed_file?;
        let dir = self
            .metadata
            .as_deref()
            .and_then(|m| m.rfind('/').map(|pos| &m[..=pos]))
            .unwrap_or("");
        Some(format!("{}{}", dir, file))
    }
}

/// The list of browsable collections, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    collections: Vec<CollectionDescriptor>,
}

/// Outcome of resolving a requested collection id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub descriptor: &'a CollectionDescriptor,
    /// The id differs from what was requested; the URL should be rewritten.
    pub rewritten: bool,
}

impl Manifest {
    pub fn new(collections: Vec<CollectionDescriptor>) -> Self {
        Self { collections }
    }

    /// Parse either an array of descriptors or an object keyed by id.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let collections = match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<CollectionDescriptor>(item)
                        .map_err(|e| ValidationError::UnexpectedShape(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(map) => map
                .into_iter()
                .map(|(id, item)| {
                    let mut descriptor: CollectionDescriptor = serde_json::from_value(item)
                        .map_err(|e| ValidationError::UnexpectedShape(e.to_string()))?;
                    descriptor.id = id;
                    Ok(descriptor)
                })
                .collect::<Result<Vec<_>, ValidationError>>()?,
            _ => return Err(ValidationError::NotAnObject),
        };

        if let Some(missing) = collections.iter().find(|c| c.id.is_empty()) {
            return Err(ValidationError::UnexpectedShape(format!(
                "collection {:?} has no id",
                missing.title
            )));
        }

        Ok(Self { collections })
    }

    pub fn collections(&self) -> &[CollectionDescriptor] {
        &self.collections
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CollectionDescriptor> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Requested id if known, else the fallback, else the first collection.
    pub fn resolve(&self, requested: Option<&str>, fallback: &str) -> Option<Resolved<'_>> {
        let wanted = requested.filter(|r| !r.is_empty()).unwrap_or(fallback);

        let descriptor = self
            .get(wanted)
            .or_else(|| self.get(fallback))
            .or_else(|| self.collections.first())?;

        Some(Resolved {
            rewritten: requested != Some(descriptor.id.as_str()),
            descriptor,
        })
    }

    /// FontAwesome collections, newest version first.
    pub fn fontawesome_versions(&self) -> Vec<&CollectionDescriptor> {
        let mut versions: Vec<_> = self
            .collections
            .iter()
            .filter(|c| c.family == "fontawesome")
            .collect();
        versions.sort_by(|a, b| {
            compare_versions(
                b.version.as_deref().unwrap_or(""),
                a.version.as_deref().unwrap_or(""),
            )
        });
        versions
    }
}

/// Numeric-aware comparison: "6.10.0" sorts after "6.9.1".
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split(|c: char| !c.is_ascii_alphanumeric());
    let mut right = b.split(|c: char| !c.is_ascii_alphanumeric());
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
