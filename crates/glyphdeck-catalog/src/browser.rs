//! Pager and search coordinator for one collection view.
//!
//! A lazy collection pages straight out of its chunks until a query comes
//! in; the first query materializes the whole collection once and later
//! pages are sliced from the filtered list. Materialized collections always
//! page over an in-memory list.
//!
//! Searches carry a sequence token. A search whose token is no longer the
//! latest when it finishes is discarded instead of overwriting the view.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};

use glyphdeck_core::paging::{clamp_page, page_window, total_pages};
use glyphdeck_core::{
    filter_icons, CatalogError, ChunkCache, CollectionDescriptor, Icon, MetadataRecord,
    ICONS_PER_PAGE,
};

use crate::client::SourceClient;
use crate::loader::ChunkLoader;
use crate::materializer::CollectionMaterializer;
use crate::resolver::MetadataResolver;
use crate::source::load_full_collection;

enum Mode {
    Lazy { metadata: MetadataRecord },
    Materialized { icons: Arc<Vec<Icon>> },
}

/// Pagination state of the view. Only the browser mutates it.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub current_page: usize,
    pub icons_per_page: usize,
    pub total_pages: usize,
    /// Icons matching the current query (or the collection size in lazy paging).
    pub total: usize,
    /// Empty while a lazy collection is paged without a query.
    pub filtered: Arc<Vec<Icon>>,
    pub query: String,
}

impl ViewState {
    fn new(total: usize, filtered: Arc<Vec<Icon>>) -> Self {
        Self {
            current_page: 1,
            icons_per_page: ICONS_PER_PAGE,
            total_pages: total_pages(total, ICONS_PER_PAGE),
            total,
            filtered,
            query: String::new(),
        }
    }
}

/// What the rendering surface shows for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub collection_id: String,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub query: String,
    pub icons: Vec<Icon>,
}

impl PageView {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Monotonic search tokens.
#[derive(Default)]
struct SearchSequence(AtomicU64);

impl SearchSequence {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

pub struct Browser<C: SourceClient, K: ChunkCache> {
    descriptor: CollectionDescriptor,
    mode: Mode,
    loader: ChunkLoader<C>,
    cache: Arc<K>,
    everything: OnceCell<Arc<Vec<Icon>>>,
    materializations: AtomicUsize,
    searches: SearchSequence,
    view: Mutex<ViewState>,
}

impl<C: SourceClient, K: ChunkCache> Browser<C, K> {
    /// Open a view on `descriptor`. Lazy collections resolve their metadata,
    /// materialized ones fetch and parse every source document.
    pub async fn open(
        descriptor: CollectionDescriptor,
        client: Arc<C>,
        cache: Arc<K>,
    ) -> Result<Self, CatalogError> {
        if !descriptor.is_lazy() {
            let icons = Arc::new(load_full_collection(client.as_ref(), &descriptor).await?);
            return Ok(Self::with_icons(descriptor, client, cache, icons));
        }

        let metadata = MetadataResolver::new(client.clone())
            .resolve(&descriptor, cache.as_ref())
            .await?;
        let view = ViewState::new(metadata.total(), Arc::new(Vec::new()));
        Ok(Self::assemble(descriptor, Mode::Lazy { metadata }, view, client, cache))
    }

    /// A materialized view over an already parsed icon list, which may be
    /// shared with other views of the same collection.
    pub fn with_icons(
        descriptor: CollectionDescriptor,
        client: Arc<C>,
        cache: Arc<K>,
        icons: Arc<Vec<Icon>>,
    ) -> Self {
        let view = ViewState::new(icons.len(), icons.clone());
        Self::assemble(descriptor, Mode::Materialized { icons }, view, client, cache)
    }

    fn assemble(
        descriptor: CollectionDescriptor,
        mode: Mode,
        view: ViewState,
        client: Arc<C>,
        cache: Arc<K>,
    ) -> Self {
        tracing::info!(
            "Opened {} ({} mode, {} icons)",
            descriptor.id,
            if matches!(mode, Mode::Lazy { .. }) { "lazy" } else { "materialized" },
            view.total
        );

        Self {
            descriptor,
            mode,
            loader: ChunkLoader::new(client),
            cache,
            everything: OnceCell::new(),
            materializations: AtomicUsize::new(0),
            searches: SearchSequence::default(),
            view: Mutex::new(view),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.mode, Mode::Lazy { .. })
    }

    /// How many full materializations this view has run (0 or 1).
    pub fn materializations(&self) -> usize {
        self.materializations.load(Ordering::SeqCst)
    }

    pub async fn view_state(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    pub async fn current(&self) -> PageView {
        let view = self.view.lock().await;
        self.render(&view).await
    }

    /// Jump to `requested`, clamped to `[1, total_pages]`.
    pub async fn goto(&self, requested: i64) -> PageView {
        let mut view = self.view.lock().await;
        view.current_page = clamp_page(requested, view.total_pages);
        self.render(&view).await
    }

    pub async fn next(&self) -> PageView {
        let mut view = self.view.lock().await;
        if view.current_page < view.total_pages {
            view.current_page += 1;
        }
        self.render(&view).await
    }

    pub async fn prev(&self) -> PageView {
        let mut view = self.view.lock().await;
        if view.current_page > 1 {
            view.current_page -= 1;
        }
        self.render(&view).await
    }

    /// Apply `query` and show its first page. Returns `None` when a newer
    /// search was issued before this one finished.
    pub async fn search(&self, query: &str) -> Option<PageView> {
        let token = self.searches.issue();
        self.run_search(token, query).await
    }

    /// Like [`Browser::search`], but waits `delay` first and gives up if
    /// another search arrives meanwhile, so a burst of keystrokes costs one pass.
    pub async fn search_debounced(&self, query: &str, delay: Duration) -> Option<PageView> {
        let token = self.searches.issue();
        tokio::time::sleep(delay).await;
        if !self.searches.is_latest(token) {
            tracing::debug!("Search {:?} superseded during debounce", query);
            return None;
        }
        self.run_search(token, query).await
    }

    async fn run_search(&self, token: u64, query: &str) -> Option<PageView> {
        let needle = query.trim().to_lowercase();

        let (filtered, total) = match &self.mode {
            Mode::Lazy { metadata } if needle.is_empty() => {
                (Arc::new(Vec::new()), metadata.total())
            }
            Mode::Lazy { metadata } => {
                let everything = self.materialize_once(metadata).await;
                let hits = Arc::new(filter_icons(&everything, &needle));
                let total = hits.len();
                (hits, total)
            }
            Mode::Materialized { icons } if needle.is_empty() => (icons.clone(), icons.len()),
            Mode::Materialized { icons } => {
                let hits = Arc::new(filter_icons(icons, &needle));
                let total = hits.len();
                (hits, total)
            }
        };

        let mut view = self.view.lock().await;
        if !self.searches.is_latest(token) {
            tracing::debug!("Discarding stale search {:?}", query);
            return None;
        }

        view.query = needle;
        view.filtered = filtered;
        view.total = total;
        view.total_pages = total_pages(total, view.icons_per_page);
        view.current_page = 1;

        Some(self.render(&view).await)
    }

    async fn materialize_once(&self, metadata: &MetadataRecord) -> Arc<Vec<Icon>> {
        self.everything
            .get_or_init(|| async {
                let (icons, _) = CollectionMaterializer::materialize_all(
                    &self.loader,
                    &self.descriptor,
                    metadata,
                    self.cache.as_ref(),
                )
                .await;
                self.materializations.fetch_add(1, Ordering::SeqCst);
                Arc::new(icons)
            })
            .await
            .clone()
    }

    async fn render(&self, view: &ViewState) -> PageView {
        let icons = match &self.mode {
            Mode::Lazy { metadata } if view.query.is_empty() => {
                let window = page_window(view.current_page, view.icons_per_page, metadata.total());
                self.loader
                    .load_range(
                        &self.descriptor,
                        metadata,
                        self.cache.as_ref(),
                        window.start,
                        window.end,
                    )
                    .await
            }
            _ => {
                let window =
                    page_window(view.current_page, view.icons_per_page, view.filtered.len());
                view.filtered[window].to_vec()
            }
        };

        PageView {
            collection_id: self.descriptor.id.clone(),
            page: view.current_page,
            total_pages: view.total_pages,
            total: view.total,
            query: view.query.clone(),
            icons,
        }
    }
}
