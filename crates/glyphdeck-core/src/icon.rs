use serde::{Deserialize, Serialize};

/// Name used when a raw record carries no usable name.
pub const UNKNOWN_NAME: &str = "unknown";

/// A normalized icon, identical in shape whatever source format it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    /// Identifier used in the class name (e.g. "arrow-left")
    pub name: String,
    /// Display name, defaults to `name`
    pub label: String,
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Markup copied to the clipboard (e.g. `<i class="fa-solid fa-house"></i>`)
    pub html_code: String,
}

impl Icon {
    pub fn new(name: impl Into<String>, html_code: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            terms: Vec::new(),
            tags: Vec::new(),
            description: String::new(),
            category: String::new(),
            html_code: html_code.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_terms(mut self, terms: Vec<String>) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Case-insensitive substring match over every searchable field.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);

        hit(&self.name)
            || hit(&self.label)
            || self.terms.iter().any(|t| hit(t))
            || self.tags.iter().any(|t| hit(t))
            || hit(&self.description)
            || hit(&self.category)
    }
}

/// Filter icons by a free-text query. An empty query keeps everything.
pub fn filter_icons(icons: &[Icon], query: &str) -> Vec<Icon> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return icons.to_vec();
    }
    icons.iter().filter(|i| i.matches(&needle)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults_to_name() {
        let icon = Icon::new("house", "<i class=\"icon-house\"></i>");

        assert_eq!(icon.label, "house");
        assert!(icon.terms.is_empty());
    }

    #[test]
    fn test_matches_every_field() {
        let icon = Icon::new("a", "<i></i>")
            .with_label("B")
            .with_terms(vec!["Direction".to_string()])
            .with_tags(vec!["pointer".to_string()])
            .with_description("Points somewhere")
            .with_category("Navigation");

        assert!(icon.matches("direction"));
        assert!(icon.matches("point"));
        assert!(icon.matches("somewhere"));
        assert!(icon.matches("navig"));
        assert!(icon.matches("b"));
        assert!(!icon.matches("arrow"));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let icons = vec![
            Icon::new("arrow-left", "<i></i>"),
            Icon::new("house", "<i></i>").with_label("Home ARROW"),
            Icon::new("star", "<i></i>"),
        ];

        let hits = filter_icons(&icons, "ArRoW");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].name, "house");

        assert_eq!(filter_icons(&icons, "").len(), 3);
    }

    #[test]
    fn test_serializes_html_code_in_camel_case() {
        let icon = Icon::new("x", "<i class=\"icon-x\"></i>");
        let json = serde_json::to_value(&icon).unwrap();

        assert_eq!(json["htmlCode"], "<i class=\"icon-x\"></i>");
    }
}
