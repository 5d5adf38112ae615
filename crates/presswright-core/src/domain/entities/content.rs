use serde::{Deserialize, Serialize};

use super::common::OrderedMap;
use crate::domain::value_objects::AuthorsHandling;

/// The optional `content` block: WXR sources per post type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(
        default,
        deserialize_with = "AuthorsHandling::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_handling: Option<AuthorsHandling>,
    #[serde(default)]
    pub sources: OrderedMap<Option<String>>,
}

impl ContentSettings {
    /// Declared sources in document order, skipping types with no file.
    pub fn sources(&self) -> Vec<ContentSource> {
        self.sources
            .iter()
            .filter_map(|(content_type, file)| match file.as_deref().map(str::trim) {
                Some(file) if !file.is_empty() => Some(ContentSource {
                    content_type: content_type.to_string(),
                    file: file.to_string(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// One content type to purge and re-import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    pub content_type: String,
    /// WXR file name relative to the WXR directory.
    pub file: String,
}
