use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use glyphdeck_catalog::{PageView, SourceBackend};
use glyphdeck_core::{CatalogError, CollectionDescriptor, Manifest};

use super::views::{escape, render_browser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/render", get(render))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.manifest))
}

#[derive(Deserialize)]
pub struct RenderQuery {
    collection: Option<String>,
}

async fn render(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Response {
    let Some(resolved) = state
        .manifest
        .resolve(query.collection.as_deref(), &state.default_collection)
    else {
        let err = CatalogError::UnknownCollection(query.collection.unwrap_or_default());
        return error_page(StatusCode::NOT_FOUND, &err);
    };
    let descriptor = resolved.descriptor;

    if resolved.rewritten {
        tracing::debug!(
            "Collection {:?} resolved to {}",
            query.collection,
            descriptor.id
        );
    }

    match state.open_session(descriptor).await {
        Ok((session, browser)) => {
            let view = browser.current().await;
            Html(render_page(
                &state,
                descriptor,
                &view,
                session,
                resolved.rewritten,
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to open {}: {}", descriptor.id, e);
            let status = match e {
                CatalogError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_page(status, &e)
        }
    }
}

/// Where the browser can load a source-relative asset from.
fn asset_href(source: &SourceBackend, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    match source {
        SourceBackend::Http(client) => client.url_for(path),
        SourceBackend::Fs(_) => format!("/site/{}", path.trim_start_matches('/')),
    }
}

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
    {head}
    <script src="https://unpkg.com/htmx.org@2.0.4"></script>
</head>
<body>
{body}
    <div id="toast" role="status"></div>
    <script src="/static/app.js"></script>
</body>
</html>"##,
        title = escape(title),
    )
}

fn render_index(manifest: &Manifest) -> String {
    let items: String = manifest
        .collections()
        .iter()
        .map(|c| {
            let version = c
                .version
                .as_deref()
                .map(|v| format!(r#" <span class="version">{}</span>"#, escape(v)))
                .unwrap_or_default();
            format!(
                r#"<li><a href="/render?collection={id}">{title}</a>{version} <span class="family">{family}</span></li>"#,
                id = escape(&c.id),
                title = escape(&c.title),
                family = escape(&c.family),
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    let body = format!(
        r#"    <main id="home">
        <h1>Glyphdeck</h1>
        <ul class="collections">
            {items}
        </ul>
    </main>"#
    );
    layout("Glyphdeck", "", &body)
}

fn render_version_select(manifest: &Manifest, current: &CollectionDescriptor) -> String {
    if current.family != "fontawesome" {
        return String::new();
    }
    let versions = manifest.fontawesome_versions();
    if versions.len() < 2 {
        return String::new();
    }

    let options: String = versions
        .iter()
        .map(|c| {
            let selected = if c.id == current.id { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&c.id),
                selected,
                escape(c.version.as_deref().unwrap_or(&c.title))
            )
        })
        .collect();

    format!(
        r#"<select id="fa-version" aria-label="Font Awesome version" onchange="location.href='/render?collection=' + encodeURIComponent(this.value)">{options}</select>"#
    )
}

fn render_page(
    state: &AppState,
    descriptor: &CollectionDescriptor,
    view: &PageView,
    session: Uuid,
    rewritten: bool,
) -> String {
    let head = descriptor
        .css
        .as_deref()
        .map(|css| {
            format!(
                r#"<link rel="stylesheet" href="{}">"#,
                escape(&asset_href(&state.source, css))
            )
        })
        .unwrap_or_default();

    let links: String = [("Download", &descriptor.download), ("CDN", &descriptor.cdn)]
        .iter()
        .filter_map(|(label, href)| {
            href.as_deref()
                .map(|h| format!(r#" <a href="{}">{}</a>"#, escape(h), label))
        })
        .collect();

    // Rewrites the address bar to the resolved id without navigating
    let rewrite = if rewritten {
        let id = serde_json::to_string(&descriptor.id)
            .unwrap_or_else(|_| "\"\"".to_string())
            .replace("</", "<\\/");
        format!(
            r#"<script>history.replaceState(null, "", "/render?collection=" + encodeURIComponent({id}));</script>"#
        )
    } else {
        String::new()
    };

    let body = format!(
        r##"    <header>
        <a href="/" class="home">Glyphdeck</a>
        <h1>{title}</h1>
        {select}
        <span class="links">{links}</span>
        <input type="search" name="q" placeholder="Search icons" autocomplete="off"
               hx-get="/sessions/{session}/search" hx-trigger="input changed" hx-target="#browser">
    </header>
    <main id="browser" data-session="{session}">
        {browser}
    </main>
    {rewrite}"##,
        title = escape(&descriptor.title),
        select = render_version_select(&state.manifest, descriptor),
        browser = render_browser(view, session),
    );

    layout(&descriptor.title, &head, &body)
}

fn error_page(status: StatusCode, err: &CatalogError) -> Response {
    let body = format!(
        r#"    <main id="error">
        <h1>Unable to load icons</h1>
        <p class="error">{}</p>
        <p><a href="/">Back to collections</a></p>
    </main>"#,
        escape(&err.to_string())
    );
    (status, Html(layout("Glyphdeck", "", &body))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphdeck_catalog::{FsSourceClient, HttpSourceClient};

    #[test]
    fn test_asset_href() {
        let fs = SourceBackend::Fs(FsSourceClient::new("./site"));
        assert_eq!(asset_href(&fs, "data/fa/all.css"), "/site/data/fa/all.css");

        let http = SourceBackend::Http(HttpSourceClient::new("https://icons.example.com"));
        assert_eq!(
            asset_href(&http, "data/fa/all.css"),
            "https://icons.example.com/data/fa/all.css"
        );
        assert_eq!(
            asset_href(&fs, "https://cdn.example.com/x.css"),
            "https://cdn.example.com/x.css"
        );
    }

    #[test]
    fn test_version_select_only_for_fontawesome() {
        let mut a = CollectionDescriptor::new("fontawesome-6.9.0", "Font Awesome 6.9");
        a.family = "fontawesome".to_string();
        a.version = Some("6.9.0".to_string());
        let mut b = CollectionDescriptor::new("fontawesome-7.1.0", "Font Awesome 7.1");
        b.family = "fontawesome".to_string();
        b.version = Some("7.1.0".to_string());
        let c = CollectionDescriptor::new("feather", "Feather");
        let manifest = Manifest::new(vec![a.clone(), b, c.clone()]);

        let html = render_version_select(&manifest, &a);
        let newest = html.find("7.1.0").unwrap();
        let older = html.find("6.9.0").unwrap();
        assert!(newest < older);
        assert!(html.contains(r#"<option value="fontawesome-6.9.0" selected>"#));

        assert!(render_version_select(&manifest, &c).is_empty());
    }
}
