//! Deployment targets declared in `environments`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::OrderedMap;
use super::site_config::DatabaseSettings;
use crate::domain::DomainError;

/// One named deployment target (production, staging, localhost, ...).
///
/// Read-only once resolved; the resolver hands out a transformed copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub database: EnvironmentDatabase,
    #[serde(default)]
    pub wp_config: OrderedMap<WpConfigEntry>,
    #[serde(default)]
    pub wp_cli_debug: bool,
}

impl Environment {
    /// Rewrite every URL-bearing constant to `base_url + value`.
    pub fn absolutize_url_constants(&mut self) {
        let base_url = self.base_url.clone();
        for (name, entry) in self.wp_config.iter_mut() {
            if !WpConfigEntry::is_url_constant(name) {
                continue;
            }
            if let Value::String(value) = &entry.value {
                entry.value = Value::String(format!("{base_url}{value}"));
            }
        }
    }

    /// Database credentials with every required field present.
    pub fn credentials(&self) -> Result<DatabaseCredentials, DomainError> {
        let db = &self.database;
        Ok(DatabaseCredentials {
            host: db.host.clone().unwrap_or_else(|| "localhost".into()),
            name: db
                .db_name
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or(DomainError::MissingRequiredField {
                    field: "database.db_name",
                })?,
            user: db
                .db_user
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or(DomainError::MissingRequiredField {
                    field: "database.db_user",
                })?,
            prefix: db.table_prefix.clone().unwrap_or_else(|| "wp_".into()),
            charset: db.charset.clone().unwrap_or_else(|| "utf8".into()),
            collate: db.collate.clone().unwrap_or_default(),
            skip_check: db.skip_check.unwrap_or(false),
        })
    }
}

/// Per-environment database override block. Unset fields inherit from the
/// site-level [`DatabaseSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDatabase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_check: Option<bool>,
}

impl EnvironmentDatabase {
    pub fn inherit_from(&mut self, site: &DatabaseSettings) {
        fn fill(slot: &mut Option<String>, fallback: &str) {
            if slot.is_none() && !fallback.is_empty() {
                *slot = Some(fallback.to_string());
            }
        }
        fill(&mut self.host, &site.host);
        fill(&mut self.db_name, &site.name);
        fill(&mut self.db_user, &site.user);
        fill(&mut self.table_prefix, &site.prefix);
        fill(&mut self.charset, &site.charset);
        fill(&mut self.collate, &site.collate);
        if self.skip_check.is_none() {
            self.skip_check = Some(site.skip_check);
        }
    }
}

/// Fully resolved credentials used by `config create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub host: String,
    pub name: String,
    pub user: String,
    pub prefix: String,
    pub charset: String,
    pub collate: String,
    pub skip_check: bool,
}

/// One `wp_config` constant: `{value, type, raw}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WpConfigEntry {
    pub value: Value,
    #[serde(rename = "type", default)]
    pub kind: WpConfigType,
    #[serde(default)]
    pub raw: bool,
}

impl WpConfigEntry {
    /// Constants whose name ends in `_url` carry environment-relative paths.
    pub fn is_url_constant(name: &str) -> bool {
        name.to_ascii_lowercase().ends_with("_url")
    }

    /// Non-string values are PHP literals and must be written raw.
    pub fn is_raw(&self) -> bool {
        self.raw || !self.value.is_string()
    }

    pub fn value_string(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WpConfigType {
    #[default]
    Constant,
    Variable,
}

impl std::fmt::Display for WpConfigType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Variable => write!(f, "variable"),
        }
    }
}
