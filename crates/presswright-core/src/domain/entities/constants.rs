//! The `constants.json` document: path fragments, package URLs and
//! base64-encoded regex lookups.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    #[serde(default)]
    pub defaults: ConstantDefaults,
    pub paths: ConstantPaths,
    #[serde(default)]
    pub packages: BTreeMap<String, String>,
    #[serde(default)]
    pub regex_base64: Vec<RegexEntry>,
}

impl Constants {
    pub fn wordpress_path(&self, root: &Path) -> PathBuf {
        under(root, &self.paths.wordpress)
    }

    pub fn plugins_path(&self, root: &Path) -> PathBuf {
        under(root, &self.paths.content.plugins)
    }

    pub fn themes_path(&self, root: &Path) -> PathBuf {
        under(root, &self.paths.content.themes)
    }

    pub fn wxr_path(&self, root: &Path) -> PathBuf {
        under(root, &self.paths.content.wxr)
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        under(root, &self.paths.database)
    }

    /// Decoded regex for `key`, if declared.
    pub fn regex(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.regex_base64
            .iter()
            .find(|entry| entry.key == key)
            .map(RegexEntry::decode)
            .transpose()
    }
}

/// Path fragments are written with a leading separator (`/wordpress`); they
/// are always relative to the project root.
fn under(root: &Path, fragment: &str) -> PathBuf {
    root.join(fragment.trim_start_matches(['/', '\\']))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDefaults {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for ConstantDefaults {
    fn default() -> Self {
        Self {
            version: default_version(),
            locale: default_locale(),
        }
    }
}

fn default_version() -> String {
    "latest".into()
}

fn default_locale() -> String {
    "en_US".into()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantPaths {
    #[serde(default)]
    pub devops: String,
    #[serde(default)]
    pub database: String,
    pub wordpress: String,
    #[serde(default)]
    pub content: ContentPaths,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPaths {
    #[serde(default = "default_themes")]
    pub themes: String,
    #[serde(default = "default_plugins")]
    pub plugins: String,
    #[serde(default = "default_wxr")]
    pub wxr: String,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            themes: default_themes(),
            plugins: default_plugins(),
            wxr: default_wxr(),
        }
    }
}

fn default_themes() -> String {
    "content/themes".into()
}

fn default_plugins() -> String {
    "content/plugins".into()
}

fn default_wxr() -> String {
    "content/wxr".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexEntry {
    pub key: String,
    pub value: String,
}

impl RegexEntry {
    pub fn decode(&self) -> Result<String, DomainError> {
        let bytes = STANDARD.decode(self.value.trim()).map_err(|e| {
            DomainError::InvalidConfiguration(format!("regex '{}' is not base64: {e}", self.key))
        })?;
        String::from_utf8(bytes).map_err(|e| {
            DomainError::InvalidConfiguration(format!("regex '{}' is not UTF-8: {e}", self.key))
        })
    }
}
