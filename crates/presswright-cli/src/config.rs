//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values it is handed.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`PRESSWRIGHT__PROVISIONING__STRICT=true`)
//! 3. `.presswright.toml` in the current directory
//! 4. The user config file (or the file given with `--config`)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use presswright_core::application::DEFAULT_WP_CLI_URL;

pub const LOCAL_CONFIG_FILE: &str = ".presswright.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `local` or `azure-devops`.
    pub platform: String,
    /// How wp-cli is found and fetched.
    pub wp_cli: WpCliConfig,
    /// Where the site documents and snippets live.
    pub files: FilesConfig,
    /// Defaults for `presswright provision`.
    pub provisioning: ProvisioningConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WpCliConfig {
    pub path: PathBuf,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub site_config_pattern: String,
    pub constants_pattern: String,
    pub snippets_dir: PathBuf,
    /// Structure document for `start-structure`: a local path or a URL.
    pub project_structure: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for WpCliConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wp"),
            download_url: DEFAULT_WP_CLI_URL.to_string(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            site_config_pattern: "*site.json".into(),
            constants_pattern: "*constants.json".into(),
            snippets_dir: PathBuf::from("default-files"),
            project_structure: "default-files/default-wordpress-project-structure.json".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: "local".into(),
            wp_cli: WpCliConfig::default(),
            files: FilesConfig::default(),
            provisioning: ProvisioningConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering files and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let builder = match config_file {
            Some(path) => Config::builder().add_source(File::from(path.as_path()).required(true)),
            None => Config::builder()
                .add_source(File::from(Self::config_path().as_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix("PRESSWRIGHT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.presswright.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "presswright", "presswright")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}
