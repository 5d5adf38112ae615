use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Skeleton a new site repository starts from: directories and seed files,
/// relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStructure {
    #[serde(default)]
    pub items: Vec<StructureItem>,
}

impl ProjectStructure {
    /// Names must be single relative path components, unique among their
    /// siblings. Only directories may have children.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_level(&self.items, "")
    }

    /// Number of items, nested ones included.
    pub fn item_count(&self) -> usize {
        fn count(items: &[StructureItem]) -> usize {
            items.iter().map(|i| 1 + count(&i.children)).sum()
        }
        count(&self.items)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content: Option<DefaultContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructureItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Directory,
    File,
}

/// Initial body of a seed file. A file without one is created empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum DefaultContent {
    Raw(String),
    FromUrl(String),
}

fn validate_level(items: &[StructureItem], parent: &str) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for item in items {
        let name = item.name.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(DomainError::InvalidConfiguration(format!(
                "project structure item '{parent}{}' must be a single path component",
                item.name
            )));
        }
        if !seen.insert(name) {
            return Err(DomainError::InvalidConfiguration(format!(
                "project structure item '{parent}{name}' is declared twice"
            )));
        }
        match item.kind {
            ItemKind::File if !item.children.is_empty() => {
                return Err(DomainError::InvalidConfiguration(format!(
                    "project structure file '{parent}{name}' cannot have children"
                )));
            }
            ItemKind::File => {}
            ItemKind::Directory => validate_level(&item.children, &format!("{parent}{name}/"))?,
        }
    }
    Ok(())
}
