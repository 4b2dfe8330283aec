use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde_json::{json, Value};

use glyphdeck_core::{CollectionDescriptor, FetchError};

use crate::client::SourceClient;

/// Serves canned documents and records every fetch.
#[derive(Default)]
pub struct MockSourceClient {
    documents: RwLock<HashMap<String, Value>>,
    failing: RwLock<HashSet<String>>,
    fetches: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl MockSourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: &str, document: Value) {
        self.documents
            .write()
            .unwrap()
            .insert(path.to_string(), document);
    }

    pub fn fail(&self, path: &str) {
        self.failing.write().unwrap().insert(path.to_string());
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fetched_paths(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl SourceClient for MockSourceClient {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(path.to_string());

        if self.failing.read().unwrap().contains(path) {
            return Err(FetchError::Status(500));
        }
        self.documents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

pub const METADATA_PATH: &str = "data/lawn/chunks/metadata.json";

pub fn chunk_path(index: usize) -> String {
    format!("data/lawn/chunks/chunk_{}.json", index)
}

pub fn lazy_descriptor() -> CollectionDescriptor {
    let mut descriptor = CollectionDescriptor::new("lawnicons", "Lawnicons");
    descriptor.family = "lawnicons".to_string();
    descriptor.metadata = Some(METADATA_PATH.to_string());
    descriptor.chunk_pattern = Some("data/lawn/chunks/chunk_{index}.json".to_string());
    descriptor.class_prefix = Some("lawn-".to_string());
    descriptor
}

/// Icon name at absolute position `i`.
pub fn icon_name(i: usize) -> String {
    if i % 10 == 0 {
        format!("arrow-{}", i)
    } else {
        format!("glyph-{}", i)
    }
}

/// A client serving a lazy collection of `total` icons in chunks of `chunk_size`.
pub fn lazy_source(total: usize, chunk_size: usize) -> MockSourceClient {
    let client = MockSourceClient::new();
    client.add(
        METADATA_PATH,
        json!({"total_icons": total, "chunk_size": chunk_size}),
    );

    let chunks = total.div_ceil(chunk_size);
    for index in 0..chunks {
        let start = index * chunk_size;
        let end = (start + chunk_size).min(total);
        let icons: Vec<Value> = (start..end)
            .map(|i| json!({"properties": {"name": icon_name(i)}, "icon": {"tags": ["t"]}}))
            .collect();
        client.add(&chunk_path(index), json!({"icons": icons, "index": index}));
    }
    client
}
