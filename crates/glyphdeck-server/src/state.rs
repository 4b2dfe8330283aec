use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::OnceCell;
use uuid::Uuid;

use glyphdeck_catalog::{load_full_collection, Browser, SourceBackend};
use glyphdeck_core::{CacheRegistry, CatalogError, CollectionDescriptor, Icon, Manifest};
use glyphdeck_db::{RedbCacheRegistry, RedbChunkCache};

use crate::config::Config;

pub type CatalogBrowser = Browser<SourceBackend, RedbChunkCache>;

/// Parsed icon list of a materialized collection, filled on first use.
type SharedIcons = Arc<OnceCell<Arc<Vec<Icon>>>>;

/// One open collection view.
pub struct Session {
    pub browser: Arc<CatalogBrowser>,
    created: Instant,
}

impl Session {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created.elapsed() >= ttl
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub manifest: Arc<Manifest>,
    pub source: Arc<SourceBackend>,
    pub caches: Arc<RedbCacheRegistry>,
    pub sessions: Arc<DashMap<Uuid, Session>>,
    /// Materialized collections are parsed once and shared by every view.
    collections: Arc<DashMap<String, SharedIcons>>,
    pub default_collection: String,
    pub search_debounce: Duration,
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl AppState {
    pub fn new(
        config: &Config,
        manifest: Manifest,
        source: SourceBackend,
        caches: RedbCacheRegistry,
    ) -> Self {
        Self {
            manifest: Arc::new(manifest),
            source: Arc::new(source),
            caches: Arc::new(caches),
            sessions: Arc::new(DashMap::new()),
            collections: Arc::new(DashMap::new()),
            default_collection: config.default_collection.clone(),
            search_debounce: config.search_debounce,
            session_ttl: config.session_ttl,
            max_sessions: config.max_sessions.max(1),
        }
    }

    /// Open a browser on `descriptor` and register it as a new session.
    pub async fn open_session(
        &self,
        descriptor: &CollectionDescriptor,
    ) -> Result<(Uuid, Arc<CatalogBrowser>), CatalogError> {
        let cache = self.caches.open(&descriptor.id)?;
        let browser = if descriptor.is_lazy() {
            Browser::open(descriptor.clone(), self.source.clone(), cache).await?
        } else {
            let icons = self.collection_icons(descriptor).await?;
            Browser::with_icons(descriptor.clone(), self.source.clone(), cache, icons)
        };
        let browser = Arc::new(browser);

        self.prune_sessions();
        self.evict_oldest();

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                browser: browser.clone(),
                created: Instant::now(),
            },
        );
        Ok((id, browser))
    }

    /// Live session by id. Expired sessions are treated as unknown.
    pub fn session(&self, id: Uuid) -> Option<Arc<CatalogBrowser>> {
        let session = self.sessions.get(&id)?;
        if session.is_expired(self.session_ttl) {
            return None;
        }
        Some(session.browser.clone())
    }

    /// Number of materialized collections parsed so far.
    pub fn parsed_collections(&self) -> usize {
        self.collections
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    async fn collection_icons(
        &self,
        descriptor: &CollectionDescriptor,
    ) -> Result<Arc<Vec<Icon>>, CatalogError> {
        // The map guard must not be held across the parse
        let cell = self
            .collections
            .entry(descriptor.id.clone())
            .or_default()
            .value()
            .clone();

        cell.get_or_try_init(|| async {
            load_full_collection(self.source.as_ref(), descriptor)
                .await
                .map(Arc::new)
        })
        .await
        .cloned()
    }

    /// Drop the oldest sessions until there is room for one more.
    fn evict_oldest(&self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().created)
                .map(|entry| *entry.key());
            let Some(id) = oldest else {
                break;
            };
            self.sessions.remove(&id);
            tracing::debug!("Evicted session {}", id);
        }
    }

    fn prune_sessions(&self) {
        let before = self.sessions.len();
        let ttl = self.session_ttl;
        self.sessions.retain(|_, session| !session.is_expired(ttl));

        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            tracing::debug!("Pruned {} expired sessions", pruned);
        }
    }
}
