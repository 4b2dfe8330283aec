//! HTML fragments shared by the full page and the htmx endpoints.

use uuid::Uuid;

use glyphdeck_catalog::PageView;
use glyphdeck_core::Icon;

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rebuild `<i class="..."></i>` from an icon's markup so the preview only
/// ever carries a class attribute.
fn preview(html_code: &str) -> String {
    let classes = html_code
        .split_once("class=\"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(classes, _)| classes)
        .unwrap_or_default();
    format!(r#"<i class="{}" aria-hidden="true"></i>"#, escape(classes))
}

fn render_card(icon: &Icon) -> String {
    format!(
        r#"<button type="button" class="icon-card" data-code="{code}" title="{label}">
                <span class="glyph">{preview}</span>
                <span class="name">{name}</span>
                <code>{code}</code>
            </button>"#,
        code = escape(&icon.html_code),
        label = escape(&icon.label),
        preview = preview(&icon.html_code),
        name = escape(&icon.name),
    )
}

fn render_pagination(view: &PageView, session: Uuid) -> String {
    let prev = if view.has_prev() { "" } else { " disabled" };
    let next = if view.has_next() { "" } else { " disabled" };

    format!(
        r##"<nav class="pagination">
            <button type="button" hx-get="/sessions/{session}/prev" hx-target="#browser"{prev}>&larr; Prev</button>
            <form hx-get="/sessions/{session}/page" hx-target="#browser" hx-trigger="change, submit">
                Page <input type="number" name="page" value="{page}" min="1" max="{last}"> of {total_pages}
            </form>
            <button type="button" hx-get="/sessions/{session}/next" hx-target="#browser"{next}>Next &rarr;</button>
            <span class="count">{total} icons</span>
        </nav>"##,
        page = view.page,
        last = view.total_pages.max(1),
        total_pages = view.total_pages,
        total = view.total,
    )
}

/// The swappable part of the page: grid plus pagination.
pub fn render_browser(view: &PageView, session: Uuid) -> String {
    let grid = if view.icons.is_empty() {
        let message = if view.query.is_empty() {
            "No icons on this page.".to_string()
        } else {
            format!("No icons match \u{201c}{}\u{201d}.", escape(&view.query))
        };
        format!(r#"<p class="empty">{}</p>"#, message)
    } else {
        view.icons
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<div class="icon-grid">
            {grid}
        </div>
        {pagination}"#,
        pagination = render_pagination(view, session),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(icons: Vec<Icon>, page: usize, total_pages: usize) -> PageView {
        PageView {
            collection_id: "feather".to_string(),
            page,
            total_pages,
            total: icons.len(),
            query: String::new(),
            icons,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<i class="a">&'"#),
            "&lt;i class=&quot;a&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_preview_keeps_only_classes() {
        assert_eq!(
            preview(r#"<i class="fa-solid fa-house"></i>"#),
            r#"<i class="fa-solid fa-house" aria-hidden="true"></i>"#
        );
        assert_eq!(
            preview(r#"<i class="x" onclick="evil()"></i>"#),
            r#"<i class="x" aria-hidden="true"></i>"#
        );
        assert_eq!(preview("garbage"), r#"<i class="" aria-hidden="true"></i>"#);
    }

    #[test]
    fn test_card_carries_escaped_code() {
        let icon = Icon::new("house", r#"<i class="fe-house"></i>"#);
        let html = render_browser(&view(vec![icon], 1, 1), Uuid::nil());

        assert!(html.contains(r#"data-code="&lt;i class=&quot;fe-house&quot;&gt;&lt;/i&gt;""#));
        assert!(html.contains(r#"<span class="name">house</span>"#));
    }

    #[test]
    fn test_pagination_edges_disabled() {
        let html = render_browser(&view(Vec::new(), 1, 1), Uuid::nil());
        assert!(html.contains("/prev\" hx-target=\"#browser\" disabled"));
        assert!(html.contains("/next\" hx-target=\"#browser\" disabled"));

        let html = render_browser(&view(Vec::new(), 2, 3), Uuid::nil());
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn test_empty_search_message_is_escaped() {
        let mut page = view(Vec::new(), 1, 0);
        page.query = "<b>".to_string();
        let html = render_browser(&page, Uuid::nil());
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
