//! The `site-config.json` root document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::common::OrderedMap;
use super::content::ContentSettings;
use super::environment::Environment;
use super::plugin::{Plugin, PluginSource, Theme};
use crate::domain::{DomainError, value_objects::AuthorsHandling};

/// Declarative description of one WordPress site's desired end state.
///
/// Invariant (checked by [`SiteConfiguration::validate`]): `environments` is
/// non-empty. Duplicate environment names are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfiguration {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub wp_cli: WpCliSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    pub settings: SiteSettings,

    #[serde(default)]
    pub environments: Vec<Environment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Theme>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentSettings>,

    #[serde(
        default,
        deserialize_with = "AuthorsHandling::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub authors_handling: Option<AuthorsHandling>,
}

impl SiteConfiguration {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.environments.is_empty() {
            return Err(DomainError::NoEnvironments);
        }
        if let Some(env) = self.environments.iter().find(|e| e.name.trim().is_empty()) {
            return Err(DomainError::InvalidConfiguration(format!(
                "environment with base_url '{}' has an empty name",
                env.base_url
            )));
        }
        Ok(())
    }

    /// Author handling for content import.
    ///
    /// `content.author_handling` wins over the top-level `authors_handling`;
    /// `skip` when neither is set.
    pub fn author_handling(&self) -> AuthorsHandling {
        self.content
            .as_ref()
            .and_then(|c| c.author_handling.clone())
            .or_else(|| self.authors_handling.clone())
            .unwrap_or_default()
    }

    /// `--debug` for wp-cli calls made on behalf of `environment`: either
    /// the environment or the site-wide `wp_cli` block can turn it on.
    pub fn wp_cli_debug(&self, environment: &Environment) -> bool {
        environment.wp_cli_debug || self.wp_cli.debug
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WpCliSettings {
    #[serde(default)]
    pub debug: bool,
}

/// Site-level database block. Environments inherit unset fields from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default = "default_db_prefix")]
    pub prefix: String,
    #[serde(default = "default_db_charset")]
    pub charset: String,
    #[serde(default)]
    pub collate: String,
    #[serde(default)]
    pub skip_check: bool,
    #[serde(default)]
    pub dumps: DumpSettings,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            name: String::new(),
            user: String::new(),
            prefix: default_db_prefix(),
            charset: default_db_charset(),
            collate: String::new(),
            skip_check: false,
            dumps: DumpSettings::default(),
        }
    }
}

fn default_db_host() -> String {
    "localhost".into()
}

fn default_db_prefix() -> String {
    "wp_".into()
}

fn default_db_charset() -> String {
    "utf8".into()
}

/// Templated file names for database snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpSettings {
    #[serde(default = "default_core_dump")]
    pub core: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<String>,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            core: default_core_dump(),
            theme: None,
            plugins: None,
            regular: None,
        }
    }
}

fn default_core_dump() -> String {
    "[date|Y.m.d-His]-db.core.sql".into()
}

/// The `settings` block.
///
/// Feature flags that the provisioning pipeline does not interpret (cache,
/// `empty_trash_days`, `accessible_hosts`, ...) are kept in `flags` so the
/// document round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    pub admin: AdminSettings,
    #[serde(default)]
    pub skip_content_download: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_url: Option<String>,
    #[serde(default)]
    pub aws_cloudfront: bool,
    #[serde(default, deserialize_with = "deserialize_plugins")]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub options: Vec<WpOption>,
    #[serde(flatten)]
    pub flags: Map<String, Value>,
}

/// `plugins` is normally a list; an object keyed by plugin name (including
/// the empty `{}`) is accepted too.
fn deserialize_plugins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Plugin>, D::Error> {
    #[derive(Deserialize)]
    struct KeyedPlugin {
        #[serde(default)]
        source: PluginSource,
        #[serde(default)]
        activate: bool,
        #[serde(default)]
        force: bool,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Declared {
        List(Vec<Plugin>),
        Keyed(OrderedMap<KeyedPlugin>),
    }

    Ok(match Declared::deserialize(deserializer)? {
        Declared::List(plugins) => plugins,
        Declared::Keyed(map) => map
            .iter()
            .map(|(name, p)| Plugin {
                name: name.to_string(),
                source: p.source.clone(),
                activate: p.activate,
                force: p.force,
            })
            .collect(),
    })
}

fn default_version() -> String {
    "latest".into()
}

fn default_locale() -> String {
    "en_US".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    pub user: String,
    pub email: String,
    #[serde(default)]
    pub skip_email: bool,
}

/// One entry of `settings.options`, applied with `wp option update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WpOption {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoload: Option<bool>,
}

impl WpOption {
    /// The value as wp-cli receives it: strings verbatim, everything else as JSON text.
    pub fn value_string(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
