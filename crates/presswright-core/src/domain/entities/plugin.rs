use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A plugin declared in `settings.plugins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    #[serde(default)]
    pub source: PluginSource,
    #[serde(default)]
    pub activate: bool,
    #[serde(default)]
    pub force: bool,
}

impl Plugin {
    /// Glob used to look the plugin's archive up in the plugins directory.
    pub fn zip_pattern(&self) -> String {
        format!("{}*.zip", self.name)
    }
}

/// Where a plugin is installed from, inferred from the shape of `source`.
///
/// - absent or a bare slug → [`PluginSource::Registry`]
/// - `url:<address>` or an `http(s)://` address → [`PluginSource::Url`]
/// - `zip` or anything ending in `.zip` → [`PluginSource::Zip`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PluginSource {
    #[default]
    Registry,
    Url(String),
    Zip,
}

impl PluginSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if let Some(url) = trimmed.strip_prefix("url:") {
            Self::Url(url.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else if lower == "zip" || lower.ends_with(".zip") {
            Self::Zip
        } else {
            Self::Registry
        }
    }
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => f.write_str("registry"),
            Self::Url(url) => write!(f, "url:{url}"),
            Self::Zip => f.write_str("zip"),
        }
    }
}

impl Serialize for PluginSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PluginSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// The top-level `themes` block: one theme to install and activate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub source_type: ThemeSourceType,
    pub source: String,
    #[serde(default)]
    pub has_child: bool,
}

impl Theme {
    pub fn zip_pattern(&self) -> String {
        format!("{}*.zip", self.source)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSourceType {
    /// `source` is a wordpress.org theme slug.
    #[default]
    Wordpress,
    /// `source` names an archive in the themes directory.
    Zip,
    /// `source` is a download URL.
    Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_source_from_value_shape() {
        assert_eq!(PluginSource::parse("akismet"), PluginSource::Registry);
        assert_eq!(
            PluginSource::parse("url:https://example.com/a.zip"),
            PluginSource::Url("https://example.com/a.zip".into())
        );
        assert_eq!(
            PluginSource::parse("HTTPS://example.com/b"),
            PluginSource::Url("HTTPS://example.com/b".into())
        );
        assert_eq!(PluginSource::parse("zip"), PluginSource::Zip);
        assert_eq!(PluginSource::parse("my-plugin-1.2.ZIP"), PluginSource::Zip);
    }

    #[test]
    fn deserializes_declared_plugin() {
        let plugin: Plugin = serde_json::from_str(
            r#"{"name":"akismet","source":"url:https://downloads.example.com/akismet.zip","activate":true,"force":false}"#,
        )
        .unwrap();
        assert_eq!(plugin.name, "akismet");
        assert!(matches!(plugin.source, PluginSource::Url(_)));
        assert!(plugin.activate);
        assert_eq!(plugin.zip_pattern(), "akismet*.zip");
    }

    #[test]
    fn theme_block_parses() {
        let theme: Theme = serde_json::from_str(
            r#"{"source_type":"wordpress","source":"twentytwenty","has_child":false}"#,
        )
        .unwrap();
        assert_eq!(theme.source_type, ThemeSourceType::Wordpress);
        assert_eq!(theme.zip_pattern(), "twentytwenty*.zip");
    }

    #[test]
    fn missing_source_means_registry() {
        let plugin: Plugin = serde_json::from_str(r#"{"name":"hello-dolly"}"#).unwrap();
        assert_eq!(plugin.source, PluginSource::Registry);
        assert!(!plugin.force);
    }
}
