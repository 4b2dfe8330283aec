use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glyphdeck_catalog::{load_manifest, SourceBackend};
use glyphdeck_db::init_cache;
use glyphdeck_server::{routes, AppState, Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: GLYPHDECK_LISTEN_ADDR, GLYPHDECK_SOURCE, GLYPHDECK_MANIFEST,");
            eprintln!("          GLYPHDECK_CACHE_DIR, GLYPHDECK_DEFAULT_COLLECTION,");
            eprintln!("          GLYPHDECK_SEARCH_DEBOUNCE_MS, GLYPHDECK_SESSION_TTL_SECS,");
            eprintln!("          GLYPHDECK_MAX_SESSIONS");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Glyphdeck server");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Content source: {}", config.source);
    tracing::info!("Cache directory: {}", config.cache_dir.display());

    let source = SourceBackend::from_location(&config.source);

    // The manifest is required before anything can be browsed
    let manifest = match load_manifest(&source, &config.manifest_path).await {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {} collections", manifest.collections().len());

    let caches = match init_cache(&config.cache_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cache error: {}", e);
            std::process::exit(1);
        }
    };

    let serves_local_site = matches!(source, SourceBackend::Fs(_));
    let state = AppState::new(&config, manifest, source, caches);

    // Build router
    let mut app = routes::create_router(state)
        .nest_service("/static", ServeDir::new("crates/glyphdeck-server/static"));
    if serves_local_site {
        // Collection stylesheets and fonts live next to the JSON data
        app = app.nest_service("/site", ServeDir::new(&config.source));
    }
    let app = app.layer(CorsLayer::permissive());

    // Start server
    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
