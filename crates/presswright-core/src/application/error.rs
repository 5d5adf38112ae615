//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! site configuration semantics. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while provisioning.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A required file or directory is missing.
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// A JSON document could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A pattern that must be unique matched several files.
    #[error("Pattern '{pattern}' matched {} files", .matches.len())]
    AmbiguousFile {
        pattern: String,
        matches: Vec<PathBuf>,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The external tool could not be started at all.
    #[error("Could not run '{command}': {reason}")]
    ExternalTool { command: String, reason: String },

    /// The external tool ran and failed (only raised under the abort policy).
    #[error("'{command}' failed with exit code {}", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ExternalToolFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// HTTP download failed.
    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// Shared state access failed (lock poisoned).
    #[error("Internal store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { path } => vec![
                format!("Expected to find: {}", path.display()),
                "Check the root path and the paths in constants.json".into(),
            ],
            Self::Parse { path, reason } => vec![
                format!("Fix the JSON in {}", path.display()),
                format!("Parser said: {}", reason),
            ],
            Self::AmbiguousFile { pattern, matches } => {
                let mut out = vec![format!("Only one file may match '{}'", pattern)];
                out.extend(matches.iter().map(|m| format!("  matched: {}", m.display())));
                out.push("Remove or rename the extra files".into());
                out
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read/write permissions".into(),
            ],
            Self::ExternalTool { .. } => vec![
                "Make sure wp-cli is installed and on PATH".into(),
                "Try: presswright install-wp-cli <DIR>".into(),
                "Or point wp_cli.binary in the config file at the executable".into(),
            ],
            Self::ExternalToolFailed { stderr, .. } => {
                let mut out = vec!["wp-cli reported an error (strict mode is on)".into()];
                if !stderr.trim().is_empty() {
                    out.push(format!("stderr: {}", stderr.trim()));
                }
                out.push("Re-run without --strict to continue past failing steps".into());
                out
            }
            Self::Download { url, .. } => vec![
                format!("Could not fetch {}", url),
                "Check your network connection and try again".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::AmbiguousFile { .. } => ErrorCategory::NotFound,
            Self::Parse { .. } => ErrorCategory::Configuration,
            Self::ExternalTool { .. } => ErrorCategory::Configuration,
            Self::ExternalToolFailed { .. } => ErrorCategory::Internal,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::Download { .. } => ErrorCategory::Internal,
        }
    }
}
