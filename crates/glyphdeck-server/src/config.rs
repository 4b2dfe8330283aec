use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Content root: an `http(s)://` base URL or a local directory.
    pub source: String,
    /// Manifest path relative to `source`.
    pub manifest_path: String,
    pub cache_dir: PathBuf,
    pub default_collection: String,
    pub search_debounce: Duration,
    pub session_ttl: Duration,
    /// Open views kept at once; the oldest is evicted beyond this.
    pub max_sessions: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = std::env::var("GLYPHDECK_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("GLYPHDECK_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let source = std::env::var("GLYPHDECK_SOURCE").unwrap_or_else(|_| "./site".to_string());
        if source.trim().is_empty() {
            return Err(ConfigError::Missing("GLYPHDECK_SOURCE"));
        }

        let manifest_path = std::env::var("GLYPHDECK_MANIFEST")
            .unwrap_or_else(|_| "data/collections-database.json".to_string());

        let cache_dir = std::env::var("GLYPHDECK_CACHE_DIR")
            .unwrap_or_else(|_| "./cache".to_string())
            .into();

        let default_collection = std::env::var("GLYPHDECK_DEFAULT_COLLECTION")
            .unwrap_or_else(|_| "fontawesome-7.1.0".to_string());

        let search_debounce_ms = Self::parse_u64("GLYPHDECK_SEARCH_DEBOUNCE_MS", 300)?;
        let session_ttl_secs = Self::parse_u64("GLYPHDECK_SESSION_TTL_SECS", 1800)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "GLYPHDECK_SESSION_TTL_SECS",
                "must be greater than zero",
            ));
        }

        let max_sessions = Self::parse_u64("GLYPHDECK_MAX_SESSIONS", 1000)?;
        if max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "GLYPHDECK_MAX_SESSIONS",
                "must be greater than zero",
            ));
        }

        Ok(Config {
            listen_addr,
            source: source.trim_end_matches('/').to_string(),
            manifest_path,
            cache_dir,
            default_collection,
            search_debounce: Duration::from_millis(search_debounce_ms),
            session_ttl: Duration::from_secs(session_ttl_secs),
            max_sessions: usize::try_from(max_sessions).unwrap_or(usize::MAX),
        })
    }

    fn parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
        match std::env::var(var) {
            Ok(s) if !s.is_empty() => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(var, "must be a non-negative integer")),
            _ => Ok(default),
        }
    }

    /// Configuration for tests: local source, no debounce.
    pub fn for_testing(source: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Config {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            source: source.into(),
            manifest_path: "data/collections-database.json".to_string(),
            cache_dir: cache_dir.into(),
            default_collection: "fontawesome-7.1.0".to_string(),
            search_debounce: Duration::ZERO,
            session_ttl: Duration::from_secs(1800),
            max_sessions: 100,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => {
                write!(f, "Missing required environment variable: {}", var)
            }
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_defaults() {
        let config = Config::for_testing("/tmp/site", "/tmp/cache");
        assert_eq!(config.default_collection, "fontawesome-7.1.0");
        assert_eq!(config.search_debounce, Duration::ZERO);
        assert_eq!(config.listen_addr.port(), 0);
        assert_eq!(config.max_sessions, 100);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::Missing("GLYPHDECK_SOURCE").to_string(),
            "Missing required environment variable: GLYPHDECK_SOURCE"
        );
        assert_eq!(
            ConfigError::Invalid("GLYPHDECK_SESSION_TTL_SECS", "must be greater than zero")
                .to_string(),
            "Invalid value for GLYPHDECK_SESSION_TTL_SECS: must be greater than zero"
        );
    }
}
