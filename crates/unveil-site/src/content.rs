//! Static product and solution records.
//!
//! The catalog ships inside the binary as JSON and is parsed once at startup.
//! Pages look records up by slug.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog slug `{0}`")]
    DuplicateSlug(String),
    #[error("catalog entry has an empty slug")]
    EmptySlug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Product,
    Solution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

/// One product or solution page's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub slug: String,
    pub kind: EntryKind,
    pub title: String,
    pub tagline: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Icon name used by cards and orbit decorations.
    pub icon: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// The catalog compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.slug.trim().is_empty() {
                return Err(CatalogError::EmptySlug);
            }
            if !seen.insert(entry.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(entry.slug.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, slug: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.len(), 5);
        let eor = catalog.get("employer-of-record").unwrap();
        assert_eq!(eor.kind, EntryKind::Product);
        assert_eq!(eor.features.len(), 3);
        assert_eq!(catalog.of_kind(EntryKind::Solution).count(), 2);
        assert!(catalog.get("pricing").is_none());
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let json = r#"[
            {"slug":"a","kind":"product","title":"A","tagline":"","description":"","icon":"x"},
            {"slug":"a","kind":"solution","title":"B","tagline":"","description":"","icon":"y"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateSlug(slug)) if slug == "a"
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Parse(_))));
    }
}
