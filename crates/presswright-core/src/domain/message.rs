//! Provisioning events surfaced to the user through the `Reporter` port.

use std::fmt;
use std::path::PathBuf;

use super::value_objects::ProvisioningStage;

/// Closed set of events a provisioning run reports.
///
/// Each platform reporter decides how to present them; [`fmt::Display`] is
/// the human text shared by all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ProvisioningStarted { environment: String },
    StageCompleted(ProvisioningStage),
    ProvisioningFinished { environment: String },
    AmbiguousEnvironment { name: String, count: usize },
    NoPlugins,
    PluginInstalling { name: String, source: String },
    PluginArchiveNotFound { name: String, pattern: String },
    GitignoreThemeUpdated { path: PathBuf, theme: String },
    NoContent,
    ContentImporting { content_type: String, file: PathBuf },
    CommandFailed { command: String, exit_code: Option<i32> },
    CommandStderr { command: String, stderr: String },
    UnknownToken { token: String },
    UnsafeTokenPayload { token: String },
    ConfigFileMissing { path: PathBuf },
    CloudfrontAnchorMissing { path: PathBuf },
    CloudfrontSnippetAdded { path: PathBuf },
    FileNotFound { path: PathBuf },
    GitkeepPurged { count: usize, path: PathBuf },
    WpCliInstalled { path: PathBuf },
    ProjectStructureStarted { root: PathBuf, created: usize, kept: usize },
    DatabaseExported { path: PathBuf },
}

impl Message {
    /// Stable identifier, used by reporters that tag their output.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ProvisioningStarted { .. } => "provisioning_started",
            Self::StageCompleted(_) => "stage_completed",
            Self::ProvisioningFinished { .. } => "provisioning_finished",
            Self::AmbiguousEnvironment { .. } => "ambiguous_environment",
            Self::NoPlugins => "no_plugins",
            Self::PluginInstalling { .. } => "plugin_installing",
            Self::PluginArchiveNotFound { .. } => "plugin_archive_not_found",
            Self::GitignoreThemeUpdated { .. } => "gitignore_theme_updated",
            Self::NoContent => "no_content",
            Self::ContentImporting { .. } => "content_importing",
            Self::CommandFailed { .. } => "command_failed",
            Self::CommandStderr { .. } => "command_stderr",
            Self::UnknownToken { .. } => "unknown_token",
            Self::UnsafeTokenPayload { .. } => "unsafe_token_payload",
            Self::ConfigFileMissing { .. } => "config_file_missing",
            Self::CloudfrontAnchorMissing { .. } => "cloudfront_anchor_missing",
            Self::CloudfrontSnippetAdded { .. } => "cloudfront_snippet_added",
            Self::FileNotFound { .. } => "file_not_found",
            Self::GitkeepPurged { .. } => "gitkeep_purged",
            Self::WpCliInstalled { .. } => "wp_cli_installed",
            Self::ProjectStructureStarted { .. } => "project_structure_started",
            Self::DatabaseExported { .. } => "database_exported",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProvisioningStarted { environment } => {
                write!(f, "Provisioning WordPress for environment '{environment}'")
            }
            Self::StageCompleted(stage) => write!(f, "Stage completed: {stage}"),
            Self::ProvisioningFinished { environment } => {
                write!(f, "Environment '{environment}' provisioned")
            }
            Self::AmbiguousEnvironment { name, count } => write!(
                f,
                "{count} environments are named '{name}'; using the first one declared"
            ),
            Self::NoPlugins => write!(f, "No plugins declared; skipping plugin installation"),
            Self::PluginInstalling { name, source } => {
                write!(f, "Installing plugin '{name}' from {source}")
            }
            Self::PluginArchiveNotFound { name, pattern } => write!(
                f,
                "No unique archive matches '{pattern}' for plugin '{name}'"
            ),
            Self::NoContent => write!(f, "No content sources declared; skipping import"),
            Self::ContentImporting { content_type, file } => {
                write!(f, "Importing {content_type} content from {}", file.display())
            }
            Self::CommandFailed { command, exit_code } => match exit_code {
                Some(code) => write!(f, "'{command}' exited with status {code}"),
                None => write!(f, "'{command}' was terminated by a signal"),
            },
            Self::CommandStderr { command, stderr } => {
                write!(f, "'{command}' wrote to stderr: {}", stderr.trim_end())
            }
            Self::UnknownToken { token } => {
                write!(f, "Unknown token '{token}' left unchanged")
            }
            Self::GitignoreThemeUpdated { path, theme } => {
                write!(f, "Theme entry in {} now points at '{theme}'", path.display())
            }
            Self::UnsafeTokenPayload { token } => {
                write!(f, "Token '{token}' contains a quote and was left unchanged")
            }
            Self::ConfigFileMissing { path } => {
                write!(f, "Configuration file not found at {}", path.display())
            }
            Self::CloudfrontAnchorMissing { path } => write!(
                f,
                "No insertion point for the CloudFront snippet in {}",
                path.display()
            ),
            Self::CloudfrontSnippetAdded { path } => {
                write!(f, "CloudFront forwarded-proto snippet added to {}", path.display())
            }
            Self::FileNotFound { path } => write!(f, "File not found: {}", path.display()),
            Self::GitkeepPurged { count, path } => {
                write!(f, "Removed {count} .gitkeep file(s) from {}", path.display())
            }
            Self::WpCliInstalled { path } => write!(f, "wp-cli installed at {}", path.display()),
            Self::ProjectStructureStarted { root, created, kept } => write!(
                f,
                "Project structure under {}: {created} item(s) created, {kept} already present",
                root.display()
            ),
            Self::DatabaseExported { path } => {
                write!(f, "Database exported to {}", path.display())
            }
        }
    }
}
