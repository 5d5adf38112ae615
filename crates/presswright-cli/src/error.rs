//! CLI errors: what went wrong, what to try next, and which exit code.

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use presswright_core::error::{ErrorCategory, PresswrightError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// No document matching the pattern below the site root.
    #[error("No file matching '{pattern}' below {}", .root.display())]
    SiteFileNotFound { root: PathBuf, pattern: String },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Provisioning failed: {0}")]
    Core(#[from] PresswrightError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user declined a confirmation prompt.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::SiteFileNotFound { root, pattern } => vec![
                format!("Nothing below '{}' matches '{pattern}'", root.display()),
                "Pass the file explicitly with --site-config / --constants".into(),
                "Or set files.site_config_pattern / files.constants_pattern in the config".into(),
            ],

            Self::ConfigError { .. } => vec![
                "Inspect the active configuration: presswright config list".into(),
                "Use 'presswright init --force' to recreate the default config".into(),
            ],

            Self::Core(core) => core.suggestions(),

            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec!["Nothing was changed".into()],
        }
    }

    /// Core errors keep their own category; the rest are classified here.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::Validation,
            Self::SiteFileNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => core.category(),
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Validation => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Message block for stderr. `verbose` adds the cause chain; `color`
    /// toggles ANSI styling.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: Style| {
            if color {
                text.style(style).to_string()
            } else {
                text.to_owned()
            }
        };
        let red = Style::new().red();
        let dimmed = Style::new().dimmed();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {}",
            paint("\u{2717} Error:", red.bold()),
            paint(&self.to_string(), red)
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let _ = writeln!(out, "  {}", paint(&format!("Caused by: {err}"), dimmed));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(out, "\n{}", paint("Suggestions:", Style::new().yellow().bold()));
            for suggestion in &suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let _ = writeln!(out, "\n{}", paint("Use -v / --verbose for more details.", dimmed));
        }

        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => {
                tracing::warn!(error = %self, "command failed")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(error = %self, "command failed")
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "caused by");
        }
    }
}

/// Attach a context message when converting foreign errors into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, toml::ser::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::ConfigError {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}
