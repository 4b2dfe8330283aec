use std::future::Future;
use std::path::PathBuf;

use serde_json::Value;

use glyphdeck_core::{FetchError, Validator};

/// Trait for reading JSON documents from the site's content source.
pub trait SourceClient: Send + Sync {
    fn fetch_json(&self, path: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Reads documents over HTTP relative to a base URL.
pub struct HttpSourceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSourceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl SourceClient for HttpSourceClient {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Reads documents from a local directory laid out like the site.
pub struct FsSourceClient {
    root: PathBuf,
}

impl FsSourceClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, path: &str) -> Result<PathBuf, FetchError> {
        Validator::validate_source_path(path).map_err(|e| FetchError::Unavailable(e.to_string()))?;
        Ok(self.root.join(path.trim_start_matches('/')))
    }
}

impl SourceClient for FsSourceClient {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let file = self.path_for(path)?;

        let bytes = tokio::fs::read(&file).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::Status(404),
            _ => FetchError::Unavailable(format!("{}: {}", file.display(), e)),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Either backend, picked from a configured location string.
pub enum SourceBackend {
    Http(HttpSourceClient),
    Fs(FsSourceClient),
}

impl SourceBackend {
    /// `http://` and `https://` locations use HTTP, anything else is a directory.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            SourceBackend::Http(HttpSourceClient::new(location))
        } else {
            SourceBackend::Fs(FsSourceClient::new(location))
        }
    }
}

impl SourceClient for SourceBackend {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        match self {
            SourceBackend::Http(client) => client.fetch_json(path).await,
            SourceBackend::Fs(client) => client.fetch_json(path).await,
        }
    }
}
