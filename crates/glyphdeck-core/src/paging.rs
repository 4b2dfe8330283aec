use std::ops::Range;

/// Icons shown per page.
pub const ICONS_PER_PAGE: usize = 100;

pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}

/// Clamp a requested page into `[1, total_pages]`. A collection with no
/// icons still has page 1.
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let last = total_pages.max(1) as i64;
    requested.clamp(1, last) as usize
}

/// Absolute `[start, end)` index window of a 1-based page.
pub fn page_window(page: usize, per_page: usize, total: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(1250, ICONS_PER_PAGE), 13);
        assert_eq!(total_pages(100, ICONS_PER_PAGE), 1);
        assert_eq!(total_pages(0, ICONS_PER_PAGE), 0);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 13), 1);
        assert_eq!(clamp_page(-4, 13), 1);
        assert_eq!(clamp_page(18, 13), 13);
        assert_eq!(clamp_page(7, 13), 7);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(3, 100, 1250), 200..300);
        assert_eq!(page_window(13, 100, 1250), 1200..1250);
        assert_eq!(page_window(14, 100, 1250), 1250..1250);
        assert_eq!(page_window(1, 100, 0), 0..0);
    }
}
