//! Command handlers plus the adapter wiring they share.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use presswright_adapters::{AzureDevOpsReporter, LocalFilesystem, TracingReporter};
use presswright_core::application::{ConfigurationLoader, FilePattern, ports::Reporter};
use tracing::debug;

use crate::{
    cli::Platform,
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod environment;
pub mod init;
pub mod install_wp_cli;
pub mod provision;
pub mod start_structure;

/// Reporter for the selected CI platform; the flag wins over the config.
pub(crate) fn reporter_for(
    platform: Option<Platform>,
    config: &AppConfig,
) -> CliResult<Arc<dyn Reporter>> {
    let platform = match platform {
        Some(p) => p,
        None => config
            .platform
            .parse::<Platform>()
            .map_err(|e| CliError::ConfigError {
                message: format!("Unknown platform '{}': {e}", config.platform),
                source: None,
            })?,
    };
    debug!(?platform, "Reporter selected");

    Ok(match platform {
        Platform::Local => Arc::new(TracingReporter::new()),
        Platform::AzureDevops => Arc::new(AzureDevOpsReporter::stdout()),
    })
}

/// Use `explicit` when given, otherwise the single file below `root` that
/// matches `pattern`.
pub(crate) fn site_file(
    loader: &ConfigurationLoader,
    root: &Path,
    explicit: Option<PathBuf>,
    pattern: &str,
) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let found = loader.locate_required_files(root, &[FilePattern::unique(pattern)])?;
    found
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| CliError::SiteFileNotFound {
            root: root.to_path_buf(),
            pattern: pattern.to_string(),
        })
}

pub(crate) fn local_loader() -> ConfigurationLoader {
    ConfigurationLoader::new(Arc::new(LocalFilesystem::new()))
}
