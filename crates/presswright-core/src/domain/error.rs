// ============================================================================
// domain/error.rs - SITE CONFIGURATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors cross service boundaries by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid site configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Site configuration declares no environments")]
    NoEnvironments,

    #[error("Invalid wp-cli command '{command}': {reason}")]
    InvalidCommand {
        command: &'static str,
        reason: String,
    },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Environment '{name}' not found in site configuration")]
    EnvironmentNotFound { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfiguration(msg) => vec![
                "Check your site configuration file".into(),
                format!("Details: {}", msg),
            ],
            Self::NoEnvironments => vec![
                "Add at least one entry to the \"environments\" array".into(),
                "Each environment needs a \"name\" and a \"base_url\"".into(),
            ],
            Self::EnvironmentNotFound { name } => vec![
                format!("No environment named '{}' was declared", name),
                "Environment names are matched exactly (case-sensitive)".into(),
                "Try: presswright environment <NAME> to inspect a resolved environment".into(),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("Add the '{}' field to your site configuration", field),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration(_)
            | Self::NoEnvironments
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::EnvironmentNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidCommand { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
