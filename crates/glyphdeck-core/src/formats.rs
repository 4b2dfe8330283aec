//! Parsers for the raw icon formats a collection can ship.
//!
//! Every format is deserialized into a typed raw shape first and then
//! normalized into [`Icon`]. Records missing their name are kept with the
//! [`UNKNOWN_NAME`] sentinel and counted in [`ParseOutcome::defaulted`].

use serde::Deserialize;
use serde_json::Value;

use crate::collection::{CollectionDescriptor, FaStyle, ProcessorKind};
use crate::error::ValidationError;
use crate::icon::{Icon, UNKNOWN_NAME};

/// Icons parsed from one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub icons: Vec<Icon>,
    /// Records that were missing a name and got the sentinel.
    pub defaulted: usize,
}

impl ParseOutcome {
    fn push(&mut self, icon: Icon, defaulted: bool) {
        if defaulted {
            self.defaulted += 1;
        }
        self.icons.push(icon);
    }
}

#[derive(Debug, Default, Deserialize)]
struct IcoMoonDocument {
    icons: Option<Vec<IcoMoonEntry>>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    preferences: Option<IcoMoonPreferences>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IcoMoonPreferences {
    #[serde(default)]
    class_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IcoMoonEntry {
    #[serde(default)]
    properties: IcoMoonProperties,
    #[serde(default)]
    icon: IcoMoonGlyph,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IcoMoonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IcoMoonGlyph {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct FaEntry {
    #[serde(default, alias = "label")]
    l: Option<String>,
    #[serde(default, alias = "free")]
    f: Vec<String>,
    #[serde(default)]
    t: Option<Vec<String>>,
    #[serde(default)]
    search: Option<FaSearch>,
}

#[derive(Debug, Default, Deserialize)]
struct FaSearch {
    #[serde(default)]
    terms: Vec<String>,
}

impl IcoMoonDocument {
    fn from_value(value: Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| ValidationError::UnexpectedShape(e.to_string()))
    }

    fn declared_prefix(&self) -> Option<&str> {
        self.prefix.as_deref().or(self
            .preferences
            .as_ref()
            .and_then(|p| p.class_prefix.as_deref()))
    }
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

fn class_markup(classes: &str) -> String {
    format!("<i class=\"{}\"></i>", classes)
}

/// Parse the documents of a materialized collection with its configured processor.
pub fn parse_collection(
    descriptor: &CollectionDescriptor,
    kind: ProcessorKind,
    documents: Vec<Value>,
) -> Result<ParseOutcome, ValidationError> {
    match kind {
        ProcessorKind::FaOptimized => {
            let first = documents
                .into_iter()
                .next()
                .ok_or_else(|| ValidationError::MissingPath(descriptor.id.clone(), "json source"))?;
            parse_fa_optimized(first, descriptor.fa_style)
        }
        ProcessorKind::IcoMoon => {
            let first = documents
                .into_iter()
                .next()
                .ok_or_else(|| ValidationError::MissingPath(descriptor.id.clone(), "json source"))?;
            parse_icomoon(descriptor, first)
        }
        ProcessorKind::IcoMoonBatch => parse_icomoon_batch(descriptor, documents),
    }
}

fn fa_style_prefix(style: &str, scheme: FaStyle) -> String {
    match scheme {
        FaStyle::Old => match style {
            "regular" => "far",
            "brands" => "fab",
            _ => "fas",
        }
        .to_string(),
        FaStyle::Modern => format!("fa-{}", style),
    }
}

/// `name -> {l, f, t}` maps, or the full `name -> {label, free, search.terms}` export.
/// One icon per free style.
pub fn parse_fa_optimized(document: Value, scheme: FaStyle) -> Result<ParseOutcome, ValidationError> {
    let Value::Object(entries) = document else {
        return Err(ValidationError::NotAnObject);
    };

    let mut outcome = ParseOutcome::default();
    for (name, raw) in entries {
        let entry: FaEntry = serde_json::from_value(raw)
            .map_err(|e| ValidationError::UnexpectedShape(format!("{}: {}", name, e)))?;

        let label = non_empty(entry.l).unwrap_or_else(|| name.clone());
        let terms = entry
            .t
            .or(entry.search.map(|s| s.terms))
            .unwrap_or_default();

        for style in &entry.f {
            let classes = format!("{} fa-{}", fa_style_prefix(style, scheme), name);
            let icon = Icon::new(name.clone(), class_markup(&classes))
                .with_label(label.clone())
                .with_terms(terms.clone());
            outcome.push(icon, false);
        }
    }
    Ok(outcome)
}

/// A single IcoMoon selection export.
pub fn parse_icomoon(
    descriptor: &CollectionDescriptor,
    document: Value,
) -> Result<ParseOutcome, ValidationError> {
    let doc = IcoMoonDocument::from_value(document)?;
    let prefix = descriptor.class_prefix_or(doc.declared_prefix()).to_string();
    let entries = doc.icons.unwrap_or_default();

    let mut outcome = ParseOutcome::default();
    for entry in entries {
        let name = non_empty(entry.properties.name);
        let defaulted = name.is_none();
        let name = name.unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let icon = Icon::new(name.clone(), class_markup(&format!("{}{}", prefix, name)))
            .with_terms(entry.icon.tags.unwrap_or_default())
            .with_tags(entry.tags)
            .with_description(entry.description.unwrap_or_default())
            .with_category(entry.category.unwrap_or_default());
        outcome.push(icon, defaulted);
    }
    Ok(outcome)
}

/// Several IcoMoon exports concatenated. Tags merge glyph tags then
/// property tags; description and category come from the properties.
pub fn parse_icomoon_batch(
    descriptor: &CollectionDescriptor,
    documents: Vec<Value>,
) -> Result<ParseOutcome, ValidationError> {
    let mut outcome = ParseOutcome::default();
    for document in documents {
        let doc = IcoMoonDocument::from_value(document)?;
        let prefix = descriptor.class_prefix_or(doc.declared_prefix()).to_string();

        for entry in doc.icons.unwrap_or_default() {
            let name = non_empty(entry.properties.name);
            let defaulted = name.is_none();
            let name = name.unwrap_or_else(|| UNKNOWN_NAME.to_string());

            let terms = entry.icon.tags.unwrap_or_default();
            let mut tags = terms.clone();
            tags.extend(entry.properties.tags);

            let icon = Icon::new(name.clone(), class_markup(&format!("{}{}", prefix, name)))
                .with_terms(terms)
                .with_tags(tags)
                .with_description(entry.properties.description.unwrap_or_default())
                .with_category(entry.properties.category.unwrap_or_default());
            outcome.push(icon, defaulted);
        }
    }
    Ok(outcome)
}

/// A chunk file of a lazy collection. Unlike a plain export, an entry may
/// carry its name and tags at the top level.
pub fn parse_chunk(prefix: &str, document: Value) -> Result<ParseOutcome, ValidationError> {
    let doc = IcoMoonDocument::from_value(document)?;
    let entries = doc.icons.ok_or(ValidationError::MissingIconList)?;

    let mut outcome = ParseOutcome::default();
    for entry in entries {
        let name = non_empty(entry.properties.name).or(non_empty(entry.name));
        let defaulted = name.is_none();
        let name = name.unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let terms = entry.icon.tags.unwrap_or_else(|| entry.tags.clone());
        let description = entry
            .description
            .or(entry.properties.description)
            .unwrap_or_default();
        let category = entry
            .category
            .or(entry.properties.category)
            .unwrap_or_default();

        let icon = Icon::new(name.clone(), class_markup(&format!("{}{}", prefix, name)))
            .with_terms(terms)
            .with_tags(entry.tags)
            .with_description(description)
            .with_category(category);
        outcome.push(icon, defaulted);
    }
    Ok(outcome)
}
