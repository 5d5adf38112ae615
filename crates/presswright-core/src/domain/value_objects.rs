//! Domain value objects: Token, AuthorsHandling, FailurePolicy, ProvisioningStage.
//!
//! Pure value types with equality-by-value and no identity. Parsing lives
//! next to the type; anything that needs the external tool lives in the
//! application layer.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

// ── Token ────────────────────────────────────────────────────────────────────

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\w+)\|([^\]]+)\]").expect("token pattern is a valid regex"));

/// Inline placeholder of the form `[kind|payload]` inside a configuration
/// string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: String,
    /// Byte range of the whole `[kind|payload]` text in the source value.
    pub span: Range<usize>,
}

impl Token {
    /// Every token in `value`, left to right.
    pub fn find_all(value: &str) -> Vec<Token> {
        TOKEN_PATTERN
            .captures_iter(value)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Token {
                    kind: TokenKind::from(caps.get(1)?.as_str()),
                    payload: caps.get(2)?.as_str().to_string(),
                    span: whole.start()..whole.end(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `payload` is a PHP `date()` format string.
    Date,
    /// Left as literal text.
    Unknown(String),
}

impl From<&str> for TokenKind {
    fn from(kind: &str) -> Self {
        match kind {
            "date" => Self::Date,
            other => Self::Unknown(other.to_string()),
        }
    }
}

// ── AuthorsHandling ──────────────────────────────────────────────────────────

/// How `wp import` treats post authors.
///
/// Anything other than `create` or `skip` is an authors-mapping CSV path,
/// passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthorsHandling {
    Create,
    #[default]
    Skip,
    Mapping(String),
}

impl AuthorsHandling {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Skip => "skip",
            Self::Mapping(path) => path,
        }
    }
}

impl AuthorsHandling {
    /// Field reader for the document: a non-empty string selects a handling,
    /// anything else (`{}`, `""`, `null`) leaves it unset.
    pub fn deserialize_optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Self>, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) if !raw.trim().is_empty() => {
                Some(Self::from(raw.trim()))
            }
            _ => None,
        })
    }
}

impl fmt::Display for AuthorsHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AuthorsHandling {
    fn from(raw: &str) -> Self {
        match raw {
            "create" => Self::Create,
            "skip" => Self::Skip,
            other => Self::Mapping(other.to_string()),
        }
    }
}

impl Serialize for AuthorsHandling {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuthorsHandling {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

// ── FailurePolicy ────────────────────────────────────────────────────────────

/// What to do when a wp-cli call exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure and carry on with the next step.
    #[default]
    Continue,
    /// Stop the pipeline at the failing step.
    Abort,
}

impl FailurePolicy {
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Abort } else { Self::Continue }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("continue"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" | "strict" => Ok(Self::Abort),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown failure policy '{other}' (expected continue or abort)"
            ))),
        }
    }
}

// ── ProvisioningStage ────────────────────────────────────────────────────────

/// Linear provisioning states. A run only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProvisioningStage {
    Downloaded,
    DatabaseReady,
    ConfigWritten,
    CoreInstalled,
    OptionsApplied,
    PluginsInstalled,
    ContentImported,
    DatabaseExported,
}

impl ProvisioningStage {
    pub const ALL: [ProvisioningStage; 8] = [
        Self::Downloaded,
        Self::DatabaseReady,
        Self::ConfigWritten,
        Self::CoreInstalled,
        Self::OptionsApplied,
        Self::PluginsInstalled,
        Self::ContentImported,
        Self::DatabaseExported,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::DatabaseReady => "database-ready",
            Self::ConfigWritten => "config-written",
            Self::CoreInstalled => "core-installed",
            Self::OptionsApplied => "options-applied",
            Self::PluginsInstalled => "plugins-installed",
            Self::ContentImported => "content-imported",
            Self::DatabaseExported => "database-exported",
        }
    }

    pub fn next(self) -> Option<Self> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for ProvisioningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_token() {
        let value = "[date|Y.m.d]-db-[env|name].sql";
        let tokens = Token::find_all(value);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Date);
        assert_eq!(tokens[0].payload, "Y.m.d");
        assert_eq!(&value[tokens[0].span.clone()], "[date|Y.m.d]");
        assert_eq!(tokens[1].kind, TokenKind::Unknown("env".into()));
    }

    #[test]
    fn plain_values_have_no_tokens() {
        assert!(Token::find_all("wp-content").is_empty());
        assert!(Token::find_all("[date]").is_empty());
        assert!(Token::find_all("[|x]").is_empty());
    }

    #[test]
    fn authors_handling_field_ignores_non_strings() {
        #[derive(Deserialize)]
        struct Doc {
            #[serde(default, deserialize_with = "AuthorsHandling::deserialize_optional")]
            authors: Option<AuthorsHandling>,
        }
        let read = |json: &str| serde_json::from_str::<Doc>(json).unwrap().authors;

        assert_eq!(read(r#"{"authors": "create"}"#), Some(AuthorsHandling::Create));
        assert_eq!(read(r#"{"authors": {}}"#), None);
        assert_eq!(read(r#"{"authors": ""}"#), None);
        assert_eq!(read(r#"{"authors": null}"#), None);
        assert_eq!(read("{}"), None);
    }

    #[test]
    fn authors_handling_passes_paths_through() {
        assert_eq!(AuthorsHandling::from("create"), AuthorsHandling::Create);
        assert_eq!(
            AuthorsHandling::from("content/authors.csv").as_str(),
            "content/authors.csv"
        );
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!(FailurePolicy::from_str("ABORT").unwrap(), FailurePolicy::Abort);
        assert_eq!(FailurePolicy::from_strict(false), FailurePolicy::Continue);
        assert!(FailurePolicy::from_str("maybe").is_err());
    }

    #[test]
    fn stages_are_linear() {
        assert_eq!(
            ProvisioningStage::Downloaded.next(),
            Some(ProvisioningStage::DatabaseReady)
        );
        assert_eq!(ProvisioningStage::DatabaseExported.next(), None);
        assert!(ProvisioningStage::ConfigWritten < ProvisioningStage::CoreInstalled);
    }
}
