//! Application layer for Presswright.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProvisioningOrchestrator and the
//!   per-concern services it composes)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; the rules about what a
//! valid site configuration or wp-cli command is live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CommandExecutor, ConfigFileWriter, ConfigurationLoader, ContentImporter, DatabaseManager,
    DatabaseUser, EnvironmentResolver, FilePattern, PluginInstaller, Ports, ProvisionReport,
    ProvisionRequest, ProvisioningOrchestrator, ProvisioningSettings, StructureReport,
    StructureStarter, TokenConverter, Uniqueness, WpCliInstaller,
};
pub use services::{DEFAULT_WP_CLI_URL, WP_CLI_BAT, WP_CLI_PHAR};

// Re-export port traits (for adapter implementation)
pub use ports::{Downloader, Filesystem, Reporter, WpCli};

pub use error::ApplicationError;
